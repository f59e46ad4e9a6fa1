//! Shell completion requests.
//!
//! Bash's `complete -C` protocol passes the command line and cursor position
//! through the environment and reads one candidate per line from stdout.

use std::collections::HashSet;
use std::io::Write;

use cmdtree_core::{
    Command, CommandError, CompletionArgs, EnvSource, OptionCompletion, OptionExtractor,
};
use tracing::debug;

use crate::resolve_path;

/// Names of the variables that carry a completion request.
///
/// # Examples
///
/// ```
/// use cmdtree_commander::CompletionConfig;
/// use cmdtree_core::EnvSource;
///
/// let config = CompletionConfig::default();
/// let env = EnvSource::from_pairs([("COMP_LINE", "app remote add"), ("COMP_POINT", "10")]);
/// assert_eq!(config.request(&env).as_deref(), Some("app remote"));
///
/// // Without a cursor position there is no request.
/// let env = EnvSource::from_pairs([("COMP_LINE", "app remote")]);
/// assert_eq!(config.request(&env), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    /// Variable holding the full command line.
    pub line_var: String,
    /// Variable holding the cursor position within the line, in characters.
    pub point_var: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            line_var: "COMP_LINE".to_string(),
            point_var: "COMP_POINT".to_string(),
        }
    }
}

impl CompletionConfig {
    pub fn new(line_var: &str, point_var: &str) -> Self {
        Self {
            line_var: line_var.to_string(),
            point_var: point_var.to_string(),
        }
    }

    /// Returns the requested line truncated at the cursor, if `env` carries a
    /// completion request.
    ///
    /// An empty line is no request. A cursor position that is not a number,
    /// or lies past the end, means the end of the line.
    pub fn request(&self, env: &EnvSource) -> Option<String> {
        let line = env.var(&self.line_var).filter(|line| !line.is_empty())?;
        let point = env.var(&self.point_var)?;
        let point = point.trim().parse::<usize>().unwrap_or(usize::MAX);

        let end = line
            .char_indices()
            .nth(point)
            .map_or(line.len(), |(idx, _)| idx);
        Some(line[..end].to_string())
    }
}

/// Answers a completion request for `line` by writing candidates to `out`.
pub(crate) fn complete(
    extractor: &dyn OptionExtractor,
    root: &Command,
    line: &str,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let args = CompletionArgs::from_line(line);
    let resolution = resolve_path(root, &args.completed);
    let cmd = resolution.leaf;
    let args = args.slice(resolution.consumed);

    let mut seen = HashSet::new();
    let mut offered = 0;
    for candidate in candidates(extractor, cmd, &args) {
        if !candidate.starts_with(&args.last) || !seen.insert(candidate.clone()) {
            continue;
        }
        writeln!(out, "{candidate}")?;
        offered += 1;
    }

    debug!(
        command = %cmd.name,
        last = %args.last,
        offered,
        "answered completion request"
    );
    Ok(())
}

/// Unfiltered candidates for the token being edited below `cmd`.
///
/// The extractor replays the completed tokens, so what is offered matches
/// what extraction would later accept in that place.
fn candidates(extractor: &dyn OptionExtractor, cmd: &Command, args: &CompletionArgs) -> Vec<String> {
    match extractor.complete_options(args, &cmd.opts) {
        OptionCompletion::Value(values) => values,
        OptionCompletion::Flags(mut found) => {
            if args.completed.is_empty() {
                found.extend(cmd.subcommand_names().into_iter().map(String::from));
            }
            found.extend(predict_argument(cmd, 0, args));
            found
        }
        OptionCompletion::Positional(position) => predict_argument(cmd, position, args),
        OptionCompletion::Rejected => Vec::new(),
    }
}

fn predict_argument(cmd: &Command, position: usize, args: &CompletionArgs) -> Vec<String> {
    cmd.args
        .get(position)
        .and_then(|arg| arg.predict.as_ref())
        .map(|p| p.predict(args))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_requires_both_variables() {
        let config = CompletionConfig::default();
        assert_eq!(config.request(&EnvSource::from_pairs([("COMP_POINT", "3")])), None);
        assert_eq!(
            config.request(&EnvSource::from_pairs([("COMP_LINE", ""), ("COMP_POINT", "0")])),
            None
        );
    }

    #[test]
    fn test_unparseable_point_means_end_of_line() {
        let config = CompletionConfig::default();
        let env = EnvSource::from_pairs([("COMP_LINE", "app --pa"), ("COMP_POINT", "later")]);
        assert_eq!(config.request(&env).as_deref(), Some("app --pa"));
    }

    #[test]
    fn test_point_counts_characters() {
        let config = CompletionConfig::default();
        let env = EnvSource::from_pairs([("COMP_LINE", "app ünï rest"), ("COMP_POINT", "7")]);
        assert_eq!(config.request(&env).as_deref(), Some("app ünï"));
    }

    #[test]
    fn test_custom_variable_names() {
        let config = CompletionConfig::new("MY_LINE", "MY_POINT");
        let env = EnvSource::from_pairs([("MY_LINE", "app x"), ("MY_POINT", "99")]);
        assert_eq!(config.request(&env).as_deref(), Some("app x"));
        assert_eq!(
            CompletionConfig::default().request(&env),
            None
        );
    }
}
