//! Per-invocation state threaded through the pipeline.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::{Command, CommandError, Pipeline, Values};

/// Where environment variables are looked up.
///
/// Environment descriptors and completion detection both read through the
/// context's source, so an in-memory map fully isolates an invocation from
/// the process environment.
#[derive(Debug, Clone, Default)]
pub enum EnvSource {
    /// The process environment.
    #[default]
    Process,
    /// A fixed set of variables.
    Map(HashMap<String, String>),
}

impl EnvSource {
    /// Builds a [`EnvSource::Map`] from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        EnvSource::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Looks up a variable by exact name. Non-unicode values count as unset.
    pub fn var(&self, name: &str) -> Option<String> {
        match self {
            EnvSource::Process => std::env::var(name).ok(),
            EnvSource::Map(vars) => vars.get(name).cloned(),
        }
    }
}

/// Mutable state of one invocation.
///
/// Created by the entry point, handed by value through resolution,
/// extraction and binding, and finally consumed by the command handler.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Context, EnvSource, SharedBuffer};
///
/// let out = SharedBuffer::default();
/// let ctx = Context::new(["--depth", "5"])
///     .with_output(out.clone())
///     .with_env(EnvSource::from_pairs([("HOME", "/home/me")]));
///
/// assert_eq!(ctx.args, vec!["--depth", "5"]);
/// assert_eq!(ctx.env.var("HOME").as_deref(), Some("/home/me"));
/// assert!(ctx.values.is_empty());
/// ```
pub struct Context<'a> {
    /// Input stream handed to the handler.
    pub input: Box<dyn Read + Send>,
    /// Output stream.
    pub out: Box<dyn Write + Send>,
    /// Error stream.
    pub err: Box<dyn Write + Send>,
    /// Tokens not yet consumed by a pipeline stage.
    pub args: Vec<String>,
    /// Parsed values, keyed by canonical name.
    pub values: Values,
    /// Raw strings the values were parsed from, keyed by canonical name.
    pub strings: HashMap<String, String>,
    /// Commands from the root to the resolved leaf.
    pub path: Vec<&'a Command>,
    /// Environment lookup.
    pub env: EnvSource,
    /// The pipeline executing this context, for nested operations.
    pub pipeline: Option<Arc<dyn Pipeline>>,
}

impl<'a> Context<'a> {
    /// Creates a context over `args` with empty input, discarded output and
    /// the process environment.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: Box::new(io::empty()),
            out: Box::new(io::sink()),
            err: Box::new(io::sink()),
            args: args.into_iter().map(Into::into).collect(),
            values: Values::default(),
            strings: HashMap::new(),
            path: Vec::new(),
            env: EnvSource::Process,
            pipeline: None,
        }
    }

    /// Creates a context over the process: standard streams and the process
    /// arguments with the program name stripped.
    ///
    /// # Errors
    ///
    /// [`CommandError::NonUnicodeArgument`] if an argument is not valid
    /// Unicode. Such arguments are rejected rather than converted lossily, so
    /// a value never silently differs from what was passed.
    pub fn os() -> Result<Self, CommandError> {
        Ok(Self::from_os_args(std::env::args_os().skip(1))?
            .with_input(io::stdin())
            .with_output(io::stdout())
            .with_error(io::stderr()))
    }

    /// Creates a context over platform-native argument strings.
    ///
    /// # Errors
    ///
    /// [`CommandError::NonUnicodeArgument`] naming the first argument that
    /// is not valid Unicode.
    pub fn from_os_args<I>(args: I) -> Result<Self, CommandError>
    where
        I: IntoIterator<Item = OsString>,
    {
        let args = args
            .into_iter()
            .enumerate()
            .map(|(i, arg)| {
                arg.into_string()
                    .map_err(|arg| CommandError::NonUnicodeArgument {
                        position: i + 1,
                        arg: arg.to_string_lossy().into_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(args))
    }

    pub fn with_input(mut self, input: impl Read + Send + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    pub fn with_output(mut self, out: impl Write + Send + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    pub fn with_error(mut self, err: impl Write + Send + 'static) -> Self {
        self.err = Box::new(err);
        self
    }

    pub fn with_env(mut self, env: EnvSource) -> Self {
        self.env = env;
        self
    }

    /// The root of the resolved path.
    pub fn root(&self) -> Option<&'a Command> {
        self.path.first().copied()
    }

    /// The resolved leaf command.
    pub fn command(&self) -> Option<&'a Command> {
        self.path.last().copied()
    }

    /// Names along the resolved path joined with `sep`.
    pub fn path_string(&self, sep: &str) -> String {
        self.path
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("args", &self.args)
            .field("values", &self.values)
            .field("strings", &self.strings)
            .field("path", &self.path_string("."))
            .field("env", &self.env)
            .field("pipeline", &self.pipeline.is_some())
            .finish_non_exhaustive()
    }
}

/// Cloneable in-memory writer; every clone appends to the same buffer.
///
/// Useful for capturing a handler's output, since the context (and its
/// streams) is consumed by the handler.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Returns everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_buffer_clones_share_contents() {
        let buf = SharedBuffer::default();
        let mut writer = buf.clone();
        write!(writer, "hello ").unwrap();
        writeln!(writer, "world").unwrap();
        assert_eq!(buf.contents(), "hello world\n");
    }

    #[test]
    fn test_env_map_lookup() {
        let env = EnvSource::from_pairs([("API_KEY", "secret")]);
        assert_eq!(env.var("API_KEY").as_deref(), Some("secret"));
        assert_eq!(env.var("api_key"), None);
    }

    #[test]
    fn test_from_os_args() {
        let ctx = Context::from_os_args(["--path", "good"].map(OsString::from)).unwrap();
        assert_eq!(ctx.args, vec!["--path", "good"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_argument_is_an_error() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![
            OsString::from("--path"),
            OsString::from("good"),
            OsString::from_vec(vec![b'a', 0xff]),
        ];
        match Context::from_os_args(args) {
            Err(CommandError::NonUnicodeArgument { position, arg }) => {
                assert_eq!(position, 3);
                assert_eq!(arg, "a\u{FFFD}");
            }
            other => panic!("expected NonUnicodeArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_path_helpers_on_fresh_context() {
        let ctx = Context::new(["a"]);
        assert!(ctx.root().is_none());
        assert!(ctx.command().is_none());
        assert_eq!(ctx.path_string("."), "");
    }
}
