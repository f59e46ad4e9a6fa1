//! Command tree and value descriptor definitions.
//!
//! A [`Command`] is a node in a rooted tree: it owns its children, the
//! options, positional arguments and environment variables it declares, and
//! an optional handler. Every configurable unit is declared by an [`O`]
//! descriptor.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::value::{ParseFn, Value};
use crate::{BoxError, CommandError, Context, Predictor, ValidationError};

/// Handler invoked with the fully populated context of a resolved command.
pub type Handler = Arc<dyn Fn(Context<'_>) -> Result<(), BoxError> + Send + Sync>;

/// Semantic type tag of a descriptor's value.
///
/// Drives boolean-switch detection in the extractor, default parsing for
/// descriptors without an explicit parser, and help rendering.
///
/// # Examples
///
/// ```
/// use cmdtree_core::ValueType;
///
/// assert!(ValueType::Bool.is_switch());
/// assert!(ValueType::Integer.default_parser().is_some());
/// assert!(ValueType::Custom("x509::Cert".into()).default_parser().is_none());
/// assert_eq!(ValueType::Custom("x509::Cert".into()).label(), "Cert");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValueType {
    /// Boolean switch; given alone it binds `true`.
    Bool,
    /// Raw string (the default).
    #[default]
    String,
    /// Signed integer (`i64` when parsed by default).
    Integer,
    /// Unsigned integer (`u64` when parsed by default).
    Unsigned,
    /// Floating point number (`f64` when parsed by default).
    Float,
    /// Duration such as `1h30m` (`std::time::Duration`).
    Duration,
    /// Filesystem path (`PathBuf`).
    Path,
    /// IP address (`IpAddr`).
    Address,
    /// Application type parsed by its own [`FromText`](crate::FromText) impl.
    Custom(String),
}

impl ValueType {
    /// Returns `true` for types that are given as a bare flag.
    pub fn is_switch(&self) -> bool {
        matches!(self, ValueType::Bool)
    }

    /// Short name used in help output.
    pub fn label(&self) -> &str {
        match self {
            ValueType::Bool => "bool",
            ValueType::String => "string",
            ValueType::Integer => "int",
            ValueType::Unsigned => "uint",
            ValueType::Float => "float",
            ValueType::Duration => "duration",
            ValueType::Path => "path",
            ValueType::Address => "addr",
            ValueType::Custom(name) => {
                let base = name.split('<').next().unwrap_or(name);
                base.rsplit("::").next().unwrap_or(base)
            }
        }
    }

    /// Built-in converter for this tag, `None` for [`ValueType::Custom`].
    pub fn default_parser(&self) -> Option<ParseFn> {
        use std::net::IpAddr;
        use std::path::PathBuf;
        use std::time::Duration;

        use crate::parser_for;

        match self {
            ValueType::Bool => Some(parser_for::<bool>()),
            ValueType::String => Some(parser_for::<String>()),
            ValueType::Integer => Some(parser_for::<i64>()),
            ValueType::Unsigned => Some(parser_for::<u64>()),
            ValueType::Float => Some(parser_for::<f64>()),
            ValueType::Duration => Some(parser_for::<Duration>()),
            ValueType::Path => Some(parser_for::<PathBuf>()),
            ValueType::Address => Some(parser_for::<IpAddr>()),
            ValueType::Custom(_) => None,
        }
    }
}

/// Descriptor of one configurable value: an option, a positional argument or
/// an environment variable.
///
/// `name` is a comma-separated list: the first segment is the canonical name,
/// further segments are aliases. Single-character segments are shorthands
/// spelled `-x`; longer ones are spelled `--name`.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{O, ValueType};
///
/// let verbose = O::new("verbose,v", ValueType::Bool);
/// assert_eq!(verbose.canonical_name(), "verbose");
/// assert!(verbose.matches("v"));
/// assert_eq!(verbose.flag_spellings(), vec!["--verbose", "-v"]);
///
/// let depth = O::new("depth", ValueType::Integer).required();
/// assert!(depth.require);
/// assert_eq!(depth.parse_value("12").unwrap().downcast_ref::<i64>(), Some(&12));
/// ```
#[derive(Clone, Default)]
pub struct O {
    /// Comma-separated canonical name and aliases (e.g. `"verbose,v"`).
    pub name: String,
    /// Whether the value must be supplied.
    pub require: bool,
    /// Semantic type tag.
    pub value_type: ValueType,
    /// Explicit parser; the tag's default converter is used when absent.
    pub parse: Option<ParseFn>,
    /// Completion candidate generator.
    pub predict: Option<Arc<dyn Predictor>>,
    /// Short description for help output.
    pub description: Option<String>,
}

impl O {
    /// Creates an optional descriptor with the default parser for `value_type`.
    pub fn new(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            ..Default::default()
        }
    }

    /// Marks the descriptor as required.
    pub fn required(mut self) -> Self {
        self.require = true;
        self
    }

    /// Replaces the parser.
    pub fn with_parser<F>(mut self, parse: F) -> Self
    where
        F: Fn(&str) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.parse = Some(Arc::new(parse));
        self
    }

    /// Attaches a completion predictor.
    pub fn with_predictor(mut self, predictor: impl Predictor + 'static) -> Self {
        self.predict = Some(Arc::new(predictor));
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Iterates over every name segment, canonical name first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.name.split(',')
    }

    /// The first name segment, under which values are bound.
    pub fn canonical_name(&self) -> &str {
        self.names().next().unwrap_or_default()
    }

    /// Returns `true` if any name segment equals `name`.
    pub fn matches(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }

    /// Returns `true` if `name` is one of the single-character shorthands.
    pub fn matches_short(&self, name: &str) -> bool {
        name.chars().count() == 1 && self.matches(name)
    }

    /// Returns `true` if the descriptor is a boolean switch.
    pub fn is_switch(&self) -> bool {
        self.value_type.is_switch()
    }

    /// Every spelling accepted on the command line (`--name`, `-x`).
    pub fn flag_spellings(&self) -> Vec<String> {
        self.names()
            .filter(|n| !n.is_empty())
            .map(|n| {
                if n.chars().count() == 1 {
                    format!("-{n}")
                } else {
                    format!("--{n}")
                }
            })
            .collect()
    }

    /// Returns the explicit parser or the tag's default converter.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnsupportedType`] when there is no explicit parser
    /// and the tag has no default converter.
    pub fn parser(&self) -> Result<ParseFn, ValidationError> {
        match &self.parse {
            Some(parse) => Ok(Arc::clone(parse)),
            None => self
                .value_type
                .default_parser()
                .ok_or_else(|| ValidationError::UnsupportedType(self.canonical_name().to_string())),
        }
    }

    /// Parses `raw` into a value for this descriptor.
    ///
    /// # Errors
    ///
    /// [`CommandError::ParseFailure`] wrapping the parser's error, or
    /// [`CommandError::Invalid`] if the type cannot be parsed by default.
    pub fn parse_value(&self, raw: &str) -> Result<Value, CommandError> {
        let parse = self.parser()?;
        parse(raw).map_err(|source| CommandError::ParseFailure {
            name: self.canonical_name().to_string(),
            source,
        })
    }
}

impl fmt::Debug for O {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("O")
            .field("name", &self.name)
            .field("require", &self.require)
            .field("value_type", &self.value_type)
            .field("parse", &self.parse.is_some())
            .field("predict", &self.predict.is_some())
            .field("description", &self.description)
            .finish()
    }
}

/// A node in the command tree.
///
/// Build trees with the chaining methods; a command without a handler is a
/// grouping node that only hosts children.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, O, ValueType};
///
/// let root = Command::new("app")
///     .with_opt(O::new("depth", ValueType::Integer).required())
///     .with_subcommand(Command::new("remote").with_subcommand(Command::new("add")))
///     .with_run(|_ctx| Ok(()));
///
/// assert!(root.is_runnable());
/// assert_eq!(root.subcommand_names(), vec!["remote"]);
/// assert!(!root.find_subcommand("remote").unwrap().is_runnable());
/// ```
#[derive(Clone, Default)]
pub struct Command {
    /// Name, unique among siblings.
    pub name: String,
    /// Short description for help output.
    pub description: Option<String>,
    /// Child commands, in declaration order.
    pub commands: Vec<Command>,
    /// Option descriptors.
    pub opts: Vec<O>,
    /// Positional argument descriptors, bound in order.
    pub args: Vec<O>,
    /// Environment variable descriptors.
    pub env: Vec<O>,
    /// Handler; `None` marks a non-runnable grouping node.
    pub run: Option<Handler>,
}

impl Command {
    /// Creates a command with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds an option.
    pub fn with_opt(mut self, opt: impl Into<O>) -> Self {
        self.opts.push(opt.into());
        self
    }

    /// Adds a positional argument.
    pub fn with_arg(mut self, arg: impl Into<O>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds an environment variable binding.
    pub fn with_env(mut self, env: impl Into<O>) -> Self {
        self.env.push(env.into());
        self
    }

    /// Adds a child command.
    pub fn with_subcommand(mut self, sub: Command) -> Self {
        self.commands.push(sub);
        self
    }

    /// Sets the handler.
    pub fn with_run<F>(mut self, run: F) -> Self
    where
        F: Fn(Context<'_>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.run = Some(Arc::new(run));
        self
    }

    /// Finds a direct child by exact name.
    pub fn find_subcommand(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Finds an option by any of its names.
    pub fn find_opt(&self, name: &str) -> Option<&O> {
        self.opts.iter().find(|o| o.matches(name))
    }

    /// Gets all child names.
    pub fn subcommand_names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn is_runnable(&self) -> bool {
        self.run.is_some()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("commands", &self.commands)
            .field("opts", &self.opts)
            .field("args", &self.args)
            .field("env", &self.env)
            .field("run", &self.run.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_names() {
        let o = O::new("number,n,num", ValueType::Integer);
        assert_eq!(o.canonical_name(), "number");
        assert!(o.matches("num"));
        assert!(o.matches_short("n"));
        assert!(!o.matches_short("num"));
        assert_eq!(o.flag_spellings(), vec!["--number", "-n", "--num"]);
    }

    #[test]
    fn test_single_char_canonical_name() {
        let o = O::new("x", ValueType::String);
        assert_eq!(o.canonical_name(), "x");
        assert_eq!(o.flag_spellings(), vec!["-x"]);
    }

    #[test]
    fn test_parse_value_wraps_cause() {
        let o = O::new("depth", ValueType::Integer);
        match o.parse_value("deep") {
            Err(CommandError::ParseFailure { name, source }) => {
                assert_eq!(name, "depth");
                assert!(source.to_string().contains("invalid digit"));
            }
            other => panic!("expected ParseFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_type_without_parser_is_unsupported() {
        let o = O::new("cert", ValueType::Custom("Cert".into()));
        assert!(matches!(
            o.parse_value("x"),
            Err(CommandError::Invalid(ValidationError::UnsupportedType(name))) if name == "cert"
        ));
    }

    #[test]
    fn test_explicit_parser_overrides_default() {
        let o = O::new("cert", ValueType::Custom("Cert".into()))
            .with_parser(|s| Ok(Value::new(s.len())));
        let value = o.parse_value("abcd").unwrap();
        assert_eq!(value.downcast_ref::<usize>(), Some(&4));
    }

    #[test]
    fn test_command_builders() {
        let cmd = Command::new("git")
            .with_subcommand(Command::new("commit"))
            .with_subcommand(Command::new("push"))
            .with_opt(O::new("verbose,v", ValueType::Bool));

        assert!(cmd.find_subcommand("commit").is_some());
        assert!(cmd.find_subcommand("pull").is_none());
        assert!(cmd.find_opt("v").is_some());
        assert!(!cmd.is_runnable());
    }
}
