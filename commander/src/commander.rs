//! The invocation pipeline.

use std::fmt;
use std::sync::Arc;

use cmdtree_core::{
    Command, CommandError, Context, Helper, O, OptionExtractor, Pipeline, validate_command,
};
use tracing::{debug, trace};

use crate::completion::{self, CompletionConfig};
use crate::resolve_path;

/// Runs command lines against a command tree.
///
/// Built from an injected [`OptionExtractor`] and an optional [`Helper`].
/// Cloning is cheap; every executed context carries a clone as its
/// [`Pipeline`] so built-in commands can reach the extractor and helper.
///
/// # Examples
///
/// ```
/// use cmdtree_commander::{BasicHelper, Commander};
/// use cmdtree_core::{Command, Context, Pipeline, ReqOpt, SharedBuffer};
/// use cmdtree_getopt::Getopt;
/// use std::io::Write;
///
/// let depth = ReqOpt::<i64>::new("depth");
/// let handle = depth.clone();
/// let root = Command::new("app").with_opt(&depth).with_run(move |mut ctx| {
///     writeln!(ctx.out, "depth={}", handle.get(&ctx))?;
///     Ok(())
/// });
///
/// let out = SharedBuffer::default();
/// let commander = Commander::new(Getopt::new(), BasicHelper);
/// commander
///     .execute(&root, Context::new(["--depth", "3"]).with_output(out.clone()))
///     .unwrap();
/// assert_eq!(out.contents(), "depth=3\n");
/// ```
#[derive(Clone)]
pub struct Commander {
    extractor: Arc<dyn OptionExtractor>,
    helper: Option<Arc<dyn Helper>>,
    completion: CompletionConfig,
}

impl Commander {
    /// Creates a commander with an extractor and a helper.
    pub fn new(extractor: impl OptionExtractor + 'static, helper: impl Helper + 'static) -> Self {
        Self {
            extractor: Arc::new(extractor),
            helper: Some(Arc::new(helper)),
            completion: CompletionConfig::default(),
        }
    }

    /// Creates a commander without a helper; `help` commands fail with
    /// [`CommandError::NoHelper`].
    pub fn without_helper(extractor: impl OptionExtractor + 'static) -> Self {
        Self {
            extractor: Arc::new(extractor),
            helper: None,
            completion: CompletionConfig::default(),
        }
    }

    /// Replaces the completion trigger variables.
    pub fn with_completion_config(mut self, completion: CompletionConfig) -> Self {
        self.completion = completion;
        self
    }

    pub fn completion_config(&self) -> &CompletionConfig {
        &self.completion
    }
}

impl fmt::Debug for Commander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commander")
            .field("helper", &self.helper.is_some())
            .field("completion", &self.completion)
            .finish_non_exhaustive()
    }
}

impl Pipeline for Commander {
    /// Executes `ctx` against `root`.
    ///
    /// Validates the tree, answers a completion request if the context's
    /// environment carries one, and otherwise resolves, extracts options,
    /// checks required options, binds environment variables and positional
    /// arguments, and dispatches to the leaf's handler. The first failing
    /// stage aborts the call.
    ///
    /// An error returned by the handler is passed through unchanged if it is
    /// a [`CommandError`], and wrapped in [`CommandError::Handler`] otherwise.
    fn execute<'a>(&self, root: &'a Command, mut ctx: Context<'a>) -> Result<(), CommandError> {
        if let Some(err) = validate_command(root).into_iter().next() {
            return Err(err.into());
        }

        ctx.values.clear();
        ctx.strings.clear();
        ctx.pipeline = Some(Arc::new(self.clone()));

        if let Some(line) = self.completion.request(&ctx.env) {
            debug!(line = %line, "detected completion request");
            return completion::complete(self.extractor.as_ref(), root, &line, &mut *ctx.out);
        }

        let ctx = self.resolve(root, ctx);
        let cmd = ctx.command().unwrap_or(root);
        let mut ctx = self.extractor.extract_options(ctx, &cmd.opts)?;

        if let Some(missing) = cmd
            .opts
            .iter()
            .find(|o| o.require && !ctx.values.contains(o.canonical_name()))
        {
            return Err(CommandError::MissingRequiredOption(
                missing.canonical_name().to_string(),
            ));
        }

        bind_env(&mut ctx, &cmd.env)?;
        bind_args(&mut ctx, &cmd.args)?;

        let Some(run) = cmd.run.as_ref() else {
            return Err(CommandError::NotRunnable(ctx.path_string(".")));
        };

        debug!(
            command = %ctx.path_string("."),
            values = ctx.values.len(),
            remaining = ctx.args.len(),
            "dispatching command"
        );
        run(ctx).map_err(|err| match err.downcast::<CommandError>() {
            Ok(err) => *err,
            Err(err) => CommandError::Handler(err),
        })
    }

    fn resolve<'a>(&self, root: &'a Command, mut ctx: Context<'a>) -> Context<'a> {
        let resolution = resolve_path(root, &ctx.args);
        ctx.args.drain(..resolution.consumed);
        ctx.path = resolution.path;
        ctx
    }

    fn extractor(&self) -> &dyn OptionExtractor {
        self.extractor.as_ref()
    }

    fn helper(&self) -> Option<&dyn Helper> {
        self.helper.as_deref()
    }
}

/// Binds declared environment variables. Values share the option maps.
fn bind_env(ctx: &mut Context<'_>, env: &[O]) -> Result<(), CommandError> {
    for o in env {
        let name = o.canonical_name();
        let Some(raw) = ctx.env.var(name) else {
            if o.require {
                return Err(CommandError::MissingRequiredEnv(name.to_string()));
            }
            continue;
        };

        let value = o.parse_value(&raw)?;
        trace!(variable = name, "bound environment variable");
        ctx.values.insert(name, value);
        ctx.strings.insert(name.to_string(), raw);
    }
    Ok(())
}

/// Binds remaining tokens to declared arguments, one token each, in order.
fn bind_args(ctx: &mut Context<'_>, args: &[O]) -> Result<(), CommandError> {
    for (i, o) in args.iter().enumerate() {
        if ctx.args.is_empty() {
            if let Some((pos, missing)) = args.iter().enumerate().skip(i).find(|(_, o)| o.require) {
                return Err(CommandError::MissingRequiredArgument {
                    position: pos + 1,
                    name: missing.canonical_name().to_string(),
                });
            }
            break;
        }

        let raw = ctx.args.remove(0);
        let value = o.parse_value(&raw)?;
        let name = o.canonical_name();
        trace!(argument = name, position = i + 1, "bound positional argument");
        ctx.values.insert(name, value);
        ctx.strings.insert(name.to_string(), raw);
    }
    Ok(())
}
