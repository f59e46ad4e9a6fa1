//! Core types for tree-structured command-line interfaces.
//!
//! This crate defines the building blocks shared by the extractor and the
//! commander:
//!
//! - [`Command`]: a node of the command tree with options, positional
//!   arguments, environment bindings, children and an optional handler.
//! - [`O`]: a value descriptor (name and aliases, requiredness, parser,
//!   type tag, predictor); [`Opt`] and [`ReqOpt`] are typed handles over it.
//! - [`Context`]: per-invocation state holding the streams, remaining
//!   tokens, parsed [`Values`] with their raw strings, and the resolved path.
//! - [`FromText`]: the "parses from text" capability behind default parsing.
//! - [`CompletionArgs`] and [`Predictor`]: the completion line model.
//! - [`OptionExtractor`], [`Pipeline`] and [`Helper`]: the injected seams.
//!
//! Validation ([`validate_command`]) catches duplicate names and
//! unparseable descriptors before a tree is executed.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::*;
//!
//! let depth = ReqOpt::<i64>::new("depth");
//! let path = Opt::<String>::new("path").with_predictor(PredictSet::new(["good", "bad"]));
//!
//! let root = Command::new("app")
//!     .with_opt(&depth)
//!     .with_opt(&path)
//!     .with_arg(ReqOpt::<String>::new("query"))
//!     .with_subcommand(Command::new("help"))
//!     .with_run(move |ctx| {
//!         let _depth: i64 = depth.get(&ctx);
//!         Ok(())
//!     });
//!
//! assert!(validate_command(&root).is_empty());
//! assert_eq!(root.find_opt("path").unwrap().value_type, ValueType::String);
//! ```

mod context;
mod error;
mod help;
mod opt;
mod pipeline;
mod predict;
mod types;
mod validate;
mod value;

pub use context::{Context, EnvSource, SharedBuffer};
pub use error::{BoxError, CommandError, Result, ValueError};
pub use help::{CommandOutline, HelpSubject, Helper, ValueOutline};
pub use opt::{Opt, ReqOpt};
pub use pipeline::{OptionCompletion, OptionExtractor, Pipeline};
pub use predict::{CompletionArgs, PredictAnything, PredictNothing, PredictSet, Predictor};
pub use types::*;
pub use validate::{ValidationError, validate_command};
pub use value::{FromText, ParseFn, Value, Values, parse_bool, parse_duration, parser_for};
