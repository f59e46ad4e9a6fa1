//! Invocation pipeline for cmdtree command trees.
//!
//! [`Commander`] turns a raw argument vector into a handler call:
//!
//! 1. validate the tree ([`cmdtree_core::validate_command`])
//! 2. answer a shell completion request, if the environment carries one
//! 3. resolve the command path ([`resolve_path`])
//! 4. extract options with the injected [`OptionExtractor`](cmdtree_core::OptionExtractor)
//! 5. check required options
//! 6. bind environment variables, then positional arguments
//! 7. dispatch to the leaf command's handler
//!
//! Any failing stage aborts the call with a [`CommandError`](cmdtree_core::CommandError).
//!
//! # Example
//!
//! ```
//! use cmdtree_commander::{BasicHelper, Commander, help_command};
//! use cmdtree_core::{Command, CommandError, Context, Pipeline, ReqOpt};
//! use cmdtree_getopt::Getopt;
//!
//! let query = ReqOpt::<String>::new("query");
//! let root = Command::new("app")
//!     .with_arg(&query)
//!     .with_subcommand(help_command())
//!     .with_run(|_ctx| Ok(()));
//!
//! let commander = Commander::new(Getopt::new(), BasicHelper);
//! let err = commander.execute(&root, Context::new(Vec::<String>::new())).unwrap_err();
//! assert!(matches!(
//!     err,
//!     CommandError::MissingRequiredArgument { position: 1, ref name } if name == "query"
//! ));
//! ```

mod builtin;
mod commander;
mod completion;
mod help;
mod resolve;

pub use builtin::{completion_command, help_command};
pub use commander::Commander;
pub use completion::CompletionConfig;
pub use help::BasicHelper;
pub use resolve::{Resolution, resolve_path};
