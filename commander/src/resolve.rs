//! Command tree resolution.

use cmdtree_core::Command;
use tracing::trace;

/// Outcome of walking a command tree against leading tokens.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    /// Commands from the root to the leaf, both included.
    pub path: Vec<&'a Command>,
    /// The deepest matched command (the root if nothing matched).
    pub leaf: &'a Command,
    /// Number of leading tokens that named commands along the path.
    pub consumed: usize,
}

/// Consumes the longest prefix of `args` naming a descending chain of
/// children of `root`.
///
/// Matching is exact and case-sensitive. Resolution never fails; an empty or
/// unmatched token list resolves to the root alone.
///
/// # Examples
///
/// ```
/// use cmdtree_commander::resolve_path;
/// use cmdtree_core::Command;
///
/// let root = Command::new("app")
///     .with_subcommand(Command::new("flooz").with_subcommand(Command::new("blarg")));
///
/// let res = resolve_path(&root, &["flooz", "blarg", "--depth", "3"]);
/// assert_eq!(res.path.len(), 3);
/// assert_eq!(res.leaf.name, "blarg");
/// assert_eq!(res.consumed, 2);
///
/// let res = resolve_path(&root, &["unknown"]);
/// assert_eq!(res.path.len(), 1);
/// assert_eq!(res.consumed, 0);
/// ```
pub fn resolve_path<'a, S: AsRef<str>>(root: &'a Command, args: &[S]) -> Resolution<'a> {
    let mut path = vec![root];
    let mut leaf = root;

    for arg in args {
        match leaf.find_subcommand(arg.as_ref()) {
            Some(child) => {
                path.push(child);
                leaf = child;
            }
            None => break,
        }
    }

    let consumed = path.len() - 1;
    trace!(leaf = %leaf.name, consumed, "resolved command path");
    Resolution {
        path,
        leaf,
        consumed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Command {
        Command::new("app")
            .with_subcommand(Command::new("help"))
            .with_subcommand(
                Command::new("remote")
                    .with_subcommand(Command::new("add"))
                    .with_subcommand(Command::new("remove")),
            )
    }

    #[test]
    fn test_empty_args_resolve_to_root() {
        let root = tree();
        let res = resolve_path::<&str>(&root, &[]);
        assert_eq!(res.path.len(), 1);
        assert_eq!(res.leaf.name, "app");
        assert_eq!(res.consumed, 0);
    }

    #[test]
    fn test_stops_at_first_unmatched_token() {
        let root = tree();
        let res = resolve_path(&root, &["remote", "origin", "add"]);
        assert_eq!(res.leaf.name, "remote");
        assert_eq!(res.consumed, 1);
    }

    #[test]
    fn test_matching_is_case_sensitive_and_exact() {
        let root = tree();
        assert_eq!(resolve_path(&root, &["Help"]).consumed, 0);
        assert_eq!(resolve_path(&root, &["hel"]).consumed, 0);
        assert_eq!(resolve_path(&root, &["help"]).path.len(), 2);
    }

    #[test]
    fn test_grandchild_names_do_not_match_at_root() {
        let root = tree();
        let res = resolve_path(&root, &["add"]);
        assert_eq!(res.leaf.name, "app");
    }

    #[test]
    fn test_owned_strings() {
        let root = tree();
        let args = vec!["remote".to_string(), "remove".to_string()];
        let res = resolve_path(&root, &args);
        let names: Vec<&str> = res.path.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["app", "remote", "remove"]);
    }
}
