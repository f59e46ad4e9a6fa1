//! Seams between the pipeline stages.
//!
//! The extractor and the pipeline are injected rather than global: a
//! commander is built from an [`OptionExtractor`] and an optional
//! [`Helper`], and every context it executes carries a handle back to it.

use crate::{Command, CommandError, CompletionArgs, Context, Helper, O};

/// What the option grammar makes of the token being edited.
///
/// Produced by replaying the completed tokens exactly as extraction would,
/// so every candidate offered is one extraction later accepts in that place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionCompletion {
    /// The edited token is the value of a pending option; these are its
    /// predicted values.
    Value(Vec<String>),
    /// Option processing is still open; these are the flag spellings. The
    /// edited token may also be the first positional argument.
    Flags(Vec<String>),
    /// Option processing has ended (at a positional token or after `--`);
    /// the edited token is the positional argument at this index.
    Positional(usize),
    /// The completed tokens do not extract, so nothing fits.
    Rejected,
}

/// Extraction and completion of option tokens.
pub trait OptionExtractor: Send + Sync {
    /// Consumes leading option tokens from `ctx.args`, binding parsed values
    /// into `ctx.values` and raw strings into `ctx.strings`. Tokens left over
    /// are positional input.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnrecognizedOption`],
    /// [`CommandError::MissingValue`] or [`CommandError::ParseFailure`].
    fn extract_options<'a>(&self, ctx: Context<'a>, opts: &[O]) -> Result<Context<'a>, CommandError>;

    /// Replays `args.completed` through the extraction grammar and reports
    /// what the edited token `args.last` can be.
    fn complete_options(&self, args: &CompletionArgs, opts: &[O]) -> OptionCompletion;
}

/// A running command pipeline, as seen from inside a handler.
pub trait Pipeline: Send + Sync {
    /// Runs the full pipeline for `root` against `ctx`.
    fn execute<'a>(&self, root: &'a Command, ctx: Context<'a>) -> Result<(), CommandError>;

    /// Resolves the command path, consuming matched tokens from `ctx.args`.
    fn resolve<'a>(&self, root: &'a Command, ctx: Context<'a>) -> Context<'a>;

    /// The injected option extractor.
    fn extractor(&self) -> &dyn OptionExtractor;

    /// The injected helper, if any.
    fn helper(&self) -> Option<&dyn Helper>;
}
