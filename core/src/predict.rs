//! Completion line model and value predictors.
//!
//! A shell completion request carries the command line up to the cursor.
//! [`CompletionArgs`] splits it into the tokens already completed and the
//! token being edited; [`Predictor`]s turn that into candidate values.

/// Tokens of a partially typed command line.
///
/// # Examples
///
/// ```
/// use cmdtree_core::CompletionArgs;
///
/// let args = CompletionArgs::from_line("app remote --name ori");
/// assert_eq!(args.completed, vec!["remote", "--name"]);
/// assert_eq!(args.last, "ori");
/// assert_eq!(args.last_completed, "--name");
///
/// // A trailing space starts a new, empty token.
/// let args = CompletionArgs::from_line("app remote ");
/// assert_eq!(args.completed, vec!["remote"]);
/// assert_eq!(args.last, "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionArgs {
    /// Every token after the program name, including the one being edited.
    pub all: Vec<String>,
    /// Tokens before the one being edited.
    pub completed: Vec<String>,
    /// The token being edited (possibly empty).
    pub last: String,
    /// The last entry of `completed`, or empty.
    pub last_completed: String,
}

impl CompletionArgs {
    /// Splits a command line (already truncated at the cursor).
    pub fn from_line(line: &str) -> Self {
        let mut parts: Vec<String> = line.split_whitespace().map(String::from).collect();
        if line.ends_with(char::is_whitespace) {
            parts.push(String::new());
        }

        let all = if parts.is_empty() {
            Vec::new()
        } else {
            parts.split_off(1)
        };
        Self::from_all(all, usize::MAX)
    }

    /// Drops the first `start` tokens, re-deriving `last` and `last_completed`.
    pub fn slice(&self, start: usize) -> Self {
        let start = start.min(self.all.len());
        Self::from_all(self.all[start..].to_vec(), self.completed.len().saturating_sub(start))
    }

    fn from_all(all: Vec<String>, completed_len: usize) -> Self {
        let completed_len = completed_len.min(all.len().saturating_sub(1));
        let completed = all[..completed_len].to_vec();
        Self {
            last: all.last().cloned().unwrap_or_default(),
            last_completed: completed.last().cloned().unwrap_or_default(),
            completed,
            all,
        }
    }
}

/// Generates completion candidates for a value.
pub trait Predictor: Send + Sync {
    /// Returns candidates for the token being edited. Filtering by prefix is
    /// done by the caller.
    fn predict(&self, args: &CompletionArgs) -> Vec<String>;
}

impl<F> Predictor for F
where
    F: Fn(&CompletionArgs) -> Vec<String> + Send + Sync,
{
    fn predict(&self, args: &CompletionArgs) -> Vec<String> {
        self(args)
    }
}

/// Predicts a fixed set of values.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{CompletionArgs, PredictSet, Predictor};
///
/// let set = PredictSet::new(["good", "bad", "ugly"]);
/// assert_eq!(set.predict(&CompletionArgs::default()), vec!["good", "bad", "ugly"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictSet(pub Vec<String>);

impl PredictSet {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(items.into_iter().map(Into::into).collect())
    }
}

impl Predictor for PredictSet {
    fn predict(&self, _args: &CompletionArgs) -> Vec<String> {
        self.0.clone()
    }
}

/// Predicts nothing; the value takes no suggestions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictNothing;

impl Predictor for PredictNothing {
    fn predict(&self, _args: &CompletionArgs) -> Vec<String> {
        Vec::new()
    }
}

/// Any value is accepted, but there is nothing sensible to suggest.
///
/// Behaves like [`PredictNothing`]; the distinct type documents intent.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictAnything;

impl Predictor for PredictAnything {
    fn predict(&self, _args: &CompletionArgs) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_line_program_only() {
        let args = CompletionArgs::from_line("app");
        assert!(args.all.is_empty());
        assert!(args.completed.is_empty());
        assert_eq!(args.last, "");

        let args = CompletionArgs::from_line("app ");
        assert_eq!(args.all, vec![""]);
        assert!(args.completed.is_empty());
    }

    #[test]
    fn test_from_line_empty() {
        assert_eq!(CompletionArgs::from_line(""), CompletionArgs::default());
    }

    #[test]
    fn test_slice_past_resolved_path() {
        let args = CompletionArgs::from_line("app foo baz --de");
        let sliced = args.slice(2);
        assert_eq!(sliced.all, vec!["--de"]);
        assert!(sliced.completed.is_empty());
        assert_eq!(sliced.last, "--de");
        assert_eq!(sliced.last_completed, "");
    }

    #[test]
    fn test_slice_keeps_completed_tail() {
        let args = CompletionArgs::from_line("app foo --depth ");
        let sliced = args.slice(1);
        assert_eq!(sliced.completed, vec!["--depth"]);
        assert_eq!(sliced.last_completed, "--depth");
        assert_eq!(sliced.last, "");
    }

    #[test]
    fn test_closure_predictor() {
        let p = |args: &CompletionArgs| vec![format!("{}-suffix", args.last)];
        let args = CompletionArgs::from_line("app x");
        assert_eq!(p.predict(&args), vec!["x-suffix"]);
    }

    #[test]
    fn test_nothing_and_anything_offer_no_candidates() {
        let args = CompletionArgs::from_line("app abc");
        assert!(PredictNothing.predict(&args).is_empty());
        assert!(PredictAnything.predict(&args).is_empty());
    }
}
