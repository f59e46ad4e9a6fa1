//! Type-erased value storage and text conversion.
//!
//! Parsed values live in [`Values`], keyed by canonical descriptor name. Each
//! [`Value`] remembers the name of the type it was built from so that a
//! mismatched typed read reports both sides.
//!
//! [`FromText`] is the "parses from text" capability: built-in scalars
//! implement it here, and application types implement it to become usable
//! with [`Opt`](crate::Opt) and [`ReqOpt`](crate::ReqOpt).

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;

use crate::{BoxError, ValueError, ValueType};

/// Parser turning a raw string into a [`Value`].
pub type ParseFn = Arc<dyn Fn(&str) -> Result<Value, BoxError> + Send + Sync>;

/// A parsed, type-erased value.
pub struct Value {
    inner: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    /// Wraps a concrete value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns the contained value if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Name of the type the value was built from.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Mapping from canonical name to parsed value.
///
/// Only names that were actually supplied (on the command line or through the
/// environment) are present; absence means "not supplied".
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Value, ValueError, Values};
///
/// let mut values = Values::default();
/// values.insert("depth", Value::new(3_i64));
///
/// assert_eq!(values.get::<i64>("depth"), Ok(3));
/// assert!(matches!(values.get::<String>("depth"), Err(ValueError::WrongType { .. })));
/// assert_eq!(values.get::<i64>("path"), Err(ValueError::NotPresent("path".into())));
/// ```
#[derive(Debug, Default)]
pub struct Values {
    entries: HashMap<String, Value>,
}

impl Values {
    /// Binds `value` under `name`, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.entries.insert(name.into(), value);
    }

    /// Returns a clone of the value bound to `name`.
    ///
    /// # Errors
    ///
    /// [`ValueError::NotPresent`] if nothing is bound, or
    /// [`ValueError::WrongType`] if the value is not a `T`.
    pub fn get<T: Any + Clone>(&self, name: &str) -> Result<T, ValueError> {
        let value = self
            .entries
            .get(name)
            .ok_or_else(|| ValueError::NotPresent(name.to_string()))?;
        value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| ValueError::WrongType {
                name: name.to_string(),
                expected: std::any::type_name::<T>(),
                found: value.type_name(),
            })
    }

    /// Returns the raw value bound to `name`.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates over the bound names (unordered).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Types that can be parsed from a single command-line token.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{BoxError, FromText, ValueType};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Percent(u8);
///
/// impl FromText for Percent {
///     fn from_text(text: &str) -> Result<Self, BoxError> {
///         let n: u8 = text.trim_end_matches('%').parse()?;
///         if n > 100 {
///             return Err(format!("{n} is more than 100%").into());
///         }
///         Ok(Percent(n))
///     }
/// }
///
/// assert_eq!(Percent::from_text("42%").unwrap(), Percent(42));
/// assert!(Percent::from_text("420%").is_err());
/// assert_eq!(Percent::value_type().label(), "Percent");
/// ```
pub trait FromText: Any + Clone + Send + Sync + Sized {
    /// Parses a value from its textual form.
    fn from_text(text: &str) -> Result<Self, BoxError>;

    /// Semantic type tag used for switch detection and help rendering.
    fn value_type() -> ValueType {
        ValueType::Custom(std::any::type_name::<Self>().to_string())
    }
}

/// Builds an erased parser from a [`FromText`] implementation.
pub fn parser_for<T: FromText>() -> ParseFn {
    Arc::new(|text: &str| T::from_text(text).map(Value::new))
}

macro_rules! from_str_text {
    ($value_type:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl FromText for $ty {
                fn from_text(text: &str) -> Result<Self, BoxError> {
                    Ok(text.parse::<$ty>()?)
                }

                fn value_type() -> ValueType {
                    $value_type
                }
            }
        )+
    };
}

from_str_text!(ValueType::Integer => i8, i16, i32, i64, i128, isize);
from_str_text!(ValueType::Unsigned => u8, u16, u32, u64, u128, usize);
from_str_text!(ValueType::Float => f32, f64);
from_str_text!(ValueType::Address => IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);
from_str_text!(ValueType::String => char);

impl FromText for String {
    fn from_text(text: &str) -> Result<Self, BoxError> {
        Ok(text.to_string())
    }

    fn value_type() -> ValueType {
        ValueType::String
    }
}

impl FromText for PathBuf {
    fn from_text(text: &str) -> Result<Self, BoxError> {
        Ok(PathBuf::from(text))
    }

    fn value_type() -> ValueType {
        ValueType::Path
    }
}

impl FromText for bool {
    fn from_text(text: &str) -> Result<Self, BoxError> {
        parse_bool(text)
    }

    fn value_type() -> ValueType {
        ValueType::Bool
    }
}

impl FromText for Duration {
    fn from_text(text: &str) -> Result<Self, BoxError> {
        parse_duration(text)
    }

    fn value_type() -> ValueType {
        ValueType::Duration
    }
}

/// Parses the boolean spellings `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(text: &str) -> Result<bool, BoxError> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(format!("invalid boolean {text:?}").into()),
    }
}

static DURATION_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d*)?|\.\d+)(ns|us|µs|ms|s|m|h)").expect("static regex must compile")
});

/// Parses durations such as `300ms`, `1.5s` or `1h30m`.
///
/// A duration is a sequence of decimal numbers, each followed by a unit
/// (`ns`, `us`/`µs`, `ms`, `s`, `m`, `h`). A bare `0` is zero. Negative
/// durations are rejected.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cmdtree_core::parse_duration;
///
/// assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
/// assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
/// assert!(parse_duration("90").is_err());
/// ```
pub fn parse_duration(text: &str) -> Result<Duration, BoxError> {
    if text == "0" {
        return Ok(Duration::ZERO);
    }
    if text.is_empty() {
        return Err("empty duration".into());
    }

    let mut nanos = 0f64;
    let mut end = 0;
    for caps in DURATION_SEGMENT.captures_iter(text) {
        let (Some(whole), Some(number), Some(unit)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            break;
        };
        if whole.start() != end {
            break;
        }
        end = whole.end();

        let amount: f64 = number.as_str().parse()?;
        let scale = match unit.as_str() {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            other => return Err(format!("unknown duration unit {other:?}").into()),
        };
        nanos += amount * scale;
    }

    if end != text.len() {
        return Err(format!("invalid duration {text:?}").into());
    }
    if !nanos.is_finite() || nanos > u64::MAX as f64 {
        return Err(format!("duration {text:?} out of range").into());
    }
    Ok(Duration::from_nanos(nanos.round() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_spellings() {
        for yes in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(parse_bool(yes).unwrap(), "{yes}");
        }
        for no in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!parse_bool(no).unwrap(), "{no}");
        }
        assert!(parse_bool("yes").is_err());
        assert!(parse_bool("").is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("300ms").unwrap(), Duration::from_millis(300));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("10µs").unwrap(), Duration::from_micros(10));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("-1s").is_err());
        assert!(parse_duration("1x").is_err());
        assert!(parse_duration("1s junk").is_err());
        assert!(parse_duration("s").is_err());
    }

    #[test]
    fn test_from_text_scalars() {
        assert_eq!(i32::from_text("-12").unwrap(), -12);
        assert!(u8::from_text("256").is_err());
        assert_eq!(f64::from_text("2.5").unwrap(), 2.5);
        assert_eq!(
            IpAddr::from_text("192.168.2.100").unwrap(),
            IpAddr::from([192, 168, 2, 100])
        );
        assert_eq!(
            PathBuf::from_text("/tmp/x").unwrap(),
            PathBuf::from("/tmp/x")
        );
        assert_eq!(u16::value_type(), ValueType::Unsigned);
        assert_eq!(Duration::value_type(), ValueType::Duration);
    }

    #[test]
    fn test_values_last_insert_wins() {
        let mut values = Values::default();
        values.insert("number", Value::new(1_i64));
        values.insert("number", Value::new(2_i64));
        assert_eq!(values.len(), 1);
        assert_eq!(values.get::<i64>("number"), Ok(2));
    }

    #[test]
    fn test_values_wrong_type_names_both_sides() {
        let mut values = Values::default();
        values.insert("depth", Value::new(5_u32));
        match values.get::<String>("depth") {
            Err(ValueError::WrongType {
                name,
                expected,
                found,
            }) => {
                assert_eq!(name, "depth");
                assert!(expected.ends_with("String"));
                assert_eq!(found, "u32");
            }
            other => panic!("expected WrongType, got {other:?}"),
        }
    }
}
