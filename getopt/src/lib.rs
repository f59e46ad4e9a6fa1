//! getopt-style option extraction.
//!
//! [`Getopt`] implements [`OptionExtractor`] with a minimal, unambiguous
//! grammar, processed left to right:
//!
//! | Token           | Meaning                                                    |
//! |-----------------|------------------------------------------------------------|
//! | `-x`            | single-character alias; binds `true` for switches, otherwise the next token is the value |
//! | `--name`        | any alias; same switch/value rule as `-x`                  |
//! | `-x=v`, `--name=v` | any alias, value after the first `=`                    |
//! | `--`            | consumed; ends option processing                           |
//! | anything else   | ends option processing; left for positional binding       |
//!
//! Clustering (`-abc`) is not supported: `-abc` is the unknown option `abc`.
//! When an option is given more than once, the last occurrence wins.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::{Context, O, OptionExtractor, ValueType};
//! use cmdtree_getopt::Getopt;
//!
//! let opts = vec![
//!     O::new("number,n", ValueType::Integer),
//!     O::new("verbose,v", ValueType::Bool),
//! ];
//! let ctx = Context::new(["-v", "--number", "1", "-n=2", "query"]);
//! let ctx = Getopt::new().extract_options(ctx, &opts).unwrap();
//!
//! assert_eq!(ctx.values.get::<i64>("number"), Ok(2));
//! assert_eq!(ctx.values.get::<bool>("verbose"), Ok(true));
//! assert_eq!(ctx.strings["number"], "2");
//! assert_eq!(ctx.args, vec!["query"]);
//! ```

mod token;

use cmdtree_core::{
    CommandError, CompletionArgs, Context, O, OptionCompletion, OptionExtractor, Value,
};
use tracing::{debug, trace};

use token::{Token, classify, find_option};

/// The getopt-style [`OptionExtractor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Getopt;

impl Getopt {
    pub fn new() -> Self {
        Self
    }
}

impl OptionExtractor for Getopt {
    fn extract_options<'a>(
        &self,
        mut ctx: Context<'a>,
        opts: &[O],
    ) -> Result<Context<'a>, CommandError> {
        let mut args = std::mem::take(&mut ctx.args);

        let outcome = scan(&args, opts, |o, raw| match raw {
            Some(raw) => bind(&mut ctx, o, raw),
            None => {
                bind_switch(&mut ctx, o);
                Ok(())
            }
        })?;
        let consumed = match outcome {
            Scan::Pending(o) => {
                return Err(CommandError::MissingValue(o.canonical_name().to_string()));
            }
            Scan::Done { consumed, .. } => consumed,
        };

        ctx.args = args.split_off(consumed);
        debug!(
            consumed,
            remaining = ctx.args.len(),
            bound = ctx.values.len(),
            "extracted options"
        );
        Ok(ctx)
    }

    fn complete_options(&self, args: &CompletionArgs, opts: &[O]) -> OptionCompletion {
        let completed = &args.completed;
        let outcome = scan(completed, opts, |o, raw| match raw {
            Some(raw) => o.parse_value(raw).map(drop),
            None => Ok(()),
        });

        match outcome {
            Ok(Scan::Pending(o)) => OptionCompletion::Value(
                o.predict
                    .as_ref()
                    .map(|p| p.predict(args))
                    .unwrap_or_default(),
            ),
            Ok(Scan::Done {
                consumed,
                terminated,
            }) if terminated || consumed < completed.len() => {
                OptionCompletion::Positional(completed.len() - consumed)
            }
            Ok(Scan::Done { .. }) => {
                OptionCompletion::Flags(opts.iter().flat_map(O::flag_spellings).collect())
            }
            Err(err) => {
                trace!(error = %err, "completed tokens do not extract");
                OptionCompletion::Rejected
            }
        }
    }
}

/// Where a left-to-right pass over option tokens ended.
#[derive(Debug)]
enum Scan<'o> {
    /// The tokens ran out while this option waited for its value.
    Pending(&'o O),
    /// Option processing ended after `consumed` tokens; `terminated` when it
    /// ended by consuming `--`.
    Done { consumed: usize, terminated: bool },
}

/// The extraction loop shared by extraction and completion.
///
/// `on_bind` receives every matched option with its raw value, or `None`
/// for a bare switch.
fn scan<'o, S: AsRef<str>>(
    args: &[S],
    opts: &'o [O],
    mut on_bind: impl FnMut(&'o O, Option<&str>) -> Result<(), CommandError>,
) -> Result<Scan<'o>, CommandError> {
    let mut consumed = 0;
    let mut pending: Option<&'o O> = None;

    for arg in args {
        let arg = arg.as_ref();
        if let Some(o) = pending.take() {
            on_bind(o, Some(arg))?;
            consumed += 1;
            continue;
        }

        let token = classify(arg);
        match token {
            Token::Positional => break,
            Token::Terminator => {
                return Ok(Scan::Done {
                    consumed: consumed + 1,
                    terminated: true,
                });
            }
            _ => {}
        }

        let o = find_option(opts, token).ok_or_else(|| {
            CommandError::UnrecognizedOption(token.name().unwrap_or_default().to_string())
        })?;
        consumed += 1;

        match token {
            Token::Assign(_, value) => on_bind(o, Some(value))?,
            _ if o.is_switch() => on_bind(o, None)?,
            _ => pending = Some(o),
        }
    }

    Ok(match pending {
        Some(o) => Scan::Pending(o),
        None => Scan::Done {
            consumed,
            terminated: false,
        },
    })
}

fn bind(ctx: &mut Context<'_>, o: &O, raw: &str) -> Result<(), CommandError> {
    let value = o.parse_value(raw)?;
    let name = o.canonical_name();
    trace!(option = name, raw, "bound option value");
    ctx.values.insert(name, value);
    ctx.strings.insert(name.to_string(), raw.to_string());
    Ok(())
}

fn bind_switch(ctx: &mut Context<'_>, o: &O) {
    let name = o.canonical_name();
    trace!(option = name, "bound switch");
    ctx.values.insert(name, Value::new(true));
    ctx.strings.insert(name.to_string(), String::new());
}
