//! Typed descriptor handles.
//!
//! [`Opt<T>`] and [`ReqOpt<T>`] wrap an [`O`] and remember the value type so
//! handlers can read values back without naming types at the access site.
//! Both convert into [`O`] for use with [`Command::with_opt`](crate::Command::with_opt),
//! [`with_arg`](crate::Command::with_arg) and [`with_env`](crate::Command::with_env).

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::value::{Value, parser_for};
use crate::{BoxError, Context, FromText, O, Predictor, ValueError};

/// An optional typed descriptor.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Context, Opt, Value};
///
/// let path = Opt::<String>::new("path");
/// let mut ctx = Context::new(Vec::<String>::new());
/// assert!(path.get(&ctx).is_err());
///
/// ctx.values.insert("path", Value::new("/tmp".to_string()));
/// assert_eq!(path.get(&ctx).unwrap(), "/tmp");
/// ```
pub struct Opt<T> {
    o: O,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromText> Opt<T> {
    /// Creates a descriptor parsed with `T`'s [`FromText`] impl.
    pub fn new(name: &str) -> Self {
        let mut o = O::new(name, T::value_type());
        o.parse = Some(parser_for::<T>());
        Self {
            o,
            _marker: PhantomData,
        }
    }

    /// Replaces the parser with a custom conversion.
    pub fn with_parser<F>(mut self, parse: F) -> Self
    where
        F: Fn(&str) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.o.parse = Some(Arc::new(move |s: &str| parse(s).map(Value::new)));
        self
    }

    /// Attaches a completion predictor.
    pub fn with_predictor(mut self, predictor: impl Predictor + 'static) -> Self {
        self.o.predict = Some(Arc::new(predictor));
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.o.description = Some(desc.to_string());
        self
    }

    /// Canonical name the value is bound under.
    pub fn name(&self) -> &str {
        self.o.canonical_name()
    }

    /// Underlying descriptor.
    pub fn descriptor(&self) -> &O {
        &self.o
    }

    /// Reads the value from the context.
    ///
    /// # Errors
    ///
    /// [`ValueError::NotPresent`] if it was not supplied, or
    /// [`ValueError::WrongType`] if something else is bound under the name.
    pub fn get(&self, ctx: &Context<'_>) -> Result<T, ValueError> {
        ctx.values.get::<T>(self.name())
    }

    /// Turns this handle into a required one.
    pub fn required(self) -> ReqOpt<T> {
        ReqOpt::from_descriptor(self.o)
    }
}

/// A required typed descriptor.
///
/// The pipeline fails before dispatch when a required value is missing, so
/// [`ReqOpt::get`] returns the value directly.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Context, ReqOpt, Value};
///
/// let depth = ReqOpt::<i64>::new("depth");
/// assert!(depth.descriptor().require);
///
/// let mut ctx = Context::new(Vec::<String>::new());
/// ctx.values.insert("depth", Value::new(500_i64));
/// assert_eq!(depth.get(&ctx), 500);
/// ```
pub struct ReqOpt<T> {
    o: O,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromText> ReqOpt<T> {
    /// Creates a required descriptor parsed with `T`'s [`FromText`] impl.
    pub fn new(name: &str) -> Self {
        Opt::<T>::new(name).required()
    }

    fn from_descriptor(mut o: O) -> Self {
        o.require = true;
        Self {
            o,
            _marker: PhantomData,
        }
    }

    /// Replaces the parser with a custom conversion.
    pub fn with_parser<F>(mut self, parse: F) -> Self
    where
        F: Fn(&str) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.o.parse = Some(Arc::new(move |s: &str| parse(s).map(Value::new)));
        self
    }

    /// Attaches a completion predictor.
    pub fn with_predictor(mut self, predictor: impl Predictor + 'static) -> Self {
        self.o.predict = Some(Arc::new(predictor));
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.o.description = Some(desc.to_string());
        self
    }

    /// Canonical name the value is bound under.
    pub fn name(&self) -> &str {
        self.o.canonical_name()
    }

    /// Underlying descriptor.
    pub fn descriptor(&self) -> &O {
        &self.o
    }

    /// Reads the value from the context.
    ///
    /// # Panics
    ///
    /// Panics if the value is absent or of another type. The pipeline
    /// validates required values before dispatch, so this only happens when
    /// the handle is read outside a successfully executed command.
    pub fn get(&self, ctx: &Context<'_>) -> T {
        match ctx.values.get::<T>(self.name()) {
            Ok(value) => value,
            Err(err) => panic!(
                "unexpected error accessing required value, this is likely a bug in the commander: {err}"
            ),
        }
    }

    /// Non-panicking read, for use outside a dispatched handler.
    pub fn try_get(&self, ctx: &Context<'_>) -> Result<T, ValueError> {
        ctx.values.get::<T>(self.name())
    }
}

impl<T> Clone for Opt<T> {
    fn clone(&self) -> Self {
        Self {
            o: self.o.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for ReqOpt<T> {
    fn clone(&self) -> Self {
        Self {
            o: self.o.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Opt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Opt").field(&self.o).finish()
    }
}

impl<T> fmt::Debug for ReqOpt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReqOpt").field(&self.o).finish()
    }
}

impl<T> From<Opt<T>> for O {
    fn from(opt: Opt<T>) -> Self {
        opt.o
    }
}

impl<T> From<&Opt<T>> for O {
    fn from(opt: &Opt<T>) -> Self {
        opt.o.clone()
    }
}

impl<T> From<ReqOpt<T>> for O {
    fn from(opt: ReqOpt<T>) -> Self {
        opt.o
    }
}

impl<T> From<&ReqOpt<T>> for O {
    fn from(opt: &ReqOpt<T>) -> Self {
        opt.o.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ValueType;

    #[test]
    fn test_typed_descriptor_carries_type_tag() {
        assert_eq!(Opt::<bool>::new("verbose,v").descriptor().value_type, ValueType::Bool);
        assert_eq!(
            ReqOpt::<Duration>::new("timeout").descriptor().value_type,
            ValueType::Duration
        );
    }

    #[test]
    fn test_custom_parser_is_typed() {
        let opt = ReqOpt::<i32>::new("foo").with_parser(|s| match s {
            "nice" => Ok(69),
            other => Err(format!("unexpected input {other:?}").into()),
        });
        let value = opt.descriptor().parse_value("nice").unwrap();
        assert_eq!(value.downcast_ref::<i32>(), Some(&69));
        assert!(opt.descriptor().parse_value("mean").is_err());
    }

    #[test]
    fn test_get_reports_absence() {
        let ctx = Context::new(Vec::<String>::new());
        let opt = Opt::<String>::new("path");
        assert_eq!(opt.get(&ctx), Err(ValueError::NotPresent("path".into())));
        assert!(opt.clone().required().try_get(&ctx).is_err());
    }

    #[test]
    #[should_panic(expected = "bug in the commander")]
    fn test_required_get_panics_when_absent() {
        let ctx = Context::new(Vec::<String>::new());
        ReqOpt::<String>::new("path").get(&ctx);
    }
}
