//! Error types for command resolution, extraction and dispatch.
//!
//! Every pipeline stage fails with a [`CommandError`]. Each variant carries the
//! offending name (and position, for positional arguments) so the embedding
//! application can print an actionable message. Typed access to the value
//! mapping fails with a [`ValueError`].

use thiserror::Error;

use crate::ValidationError;

/// Boxed error returned by parsers, predictors and command handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while executing a command line.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A token matched the flag syntax but no descriptor owns that name.
    #[error("unrecognized option {0:?}")]
    UnrecognizedOption(String),

    /// A non-boolean option was given without a value token.
    #[error("missing value for option {0:?}")]
    MissingValue(String),

    /// A required option was absent after extraction.
    #[error("missing required option {0:?}")]
    MissingRequiredOption(String),

    /// A required environment variable is not set.
    #[error("missing required environment variable {0:?}")]
    MissingRequiredEnv(String),

    /// Fewer positional tokens than required arguments (1-based position).
    #[error("missing required positional argument at position {position} {name:?}")]
    MissingRequiredArgument { position: usize, name: String },

    /// A descriptor's parser rejected the raw string.
    #[error("failed parsing {name:?}: {source}")]
    ParseFailure {
        name: String,
        #[source]
        source: BoxError,
    },

    /// Resolution reached a command without a handler (dotted path).
    #[error("would have run {0:?}, but it has no handler")]
    NotRunnable(String),

    /// A process argument is not valid Unicode (1-based position, shown
    /// lossily).
    #[error("argument {position} is not valid unicode: {arg:?}")]
    NonUnicodeArgument { position: usize, arg: String },

    /// The command tree failed construction-time validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// A built-in command was asked about a command that does not exist.
    #[error("unknown command {name:?} on {parent:?}")]
    UnknownCommand { name: String, parent: String },

    /// Help was requested but the commander has no helper.
    #[error("no helper configured on the commander")]
    NoHelper,

    /// The command handler returned an error.
    #[error("{0}")]
    Handler(#[source] BoxError),

    /// Writing to one of the context streams failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by typed access to the value mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// No value was supplied for the name.
    #[error("value {0:?} not present")]
    NotPresent(String),

    /// A value is present but holds another type.
    #[error("value for {name:?} is of type {found}, expected {expected}")]
    WrongType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Convenience alias for results with [`CommandError`].
pub type Result<T> = std::result::Result<T, CommandError>;
