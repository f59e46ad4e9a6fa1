//! Command tree validation.
//!
//! Validates structural invariants of a command tree before it is executed,
//! catching duplicate sibling names, malformed or duplicate option names and
//! descriptors that cannot be parsed, so that resolution and extraction never
//! see an ambiguous tree.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::*;
//!
//! let root = Command::new("git")
//!     .with_opt(O::new("verbose,v", ValueType::Bool))
//!     .with_subcommand(Command::new("commit"));
//! assert!(validate_command(&root).is_empty());
//!
//! // Invalid: two options answer to `-v`
//! let bad = Command::new("git")
//!     .with_opt(O::new("verbose,v", ValueType::Bool))
//!     .with_opt(O::new("version,v", ValueType::Bool));
//! assert_eq!(
//!     validate_command(&bad),
//!     vec![ValidationError::DuplicateOptionName("git: v".into())]
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{Command, O};

/// Command tree validation errors.
///
/// Each variant names the offending command path (dotted) and, where
/// relevant, the offending name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A command below the root has an empty or whitespace-only name.
    #[error("command name cannot be empty under {0}")]
    EmptyCommandName(String),
    /// Two children of the same command share a name.
    #[error("duplicate subcommand: {0}")]
    DuplicateSubcommand(String),
    /// A descriptor has an empty name segment.
    #[error("descriptor with empty name segment: {0}")]
    EmptyName(String),
    /// Two option names (or aliases) of one command collide.
    #[error("duplicate option name: {0}")]
    DuplicateOptionName(String),
    /// A descriptor has no parser and its type has no default conversion.
    #[error("cannot automatically parse non-scalar value into {0:?}")]
    UnsupportedType(String),
}

/// Validates a command tree.
///
/// Stops at the first problem found, in depth-first declaration order.
///
/// # Examples
///
/// ```
/// use cmdtree_core::*;
///
/// let root = Command::new("app")
///     .with_subcommand(Command::new("remote"))
///     .with_subcommand(Command::new("remote"));
/// assert_eq!(
///     validate_command(&root),
///     vec![ValidationError::DuplicateSubcommand("app.remote".into())]
/// );
/// ```
pub fn validate_command(root: &Command) -> Vec<ValidationError> {
    let mut path = vec![root.name.clone()];
    validate_node(root, &mut path)
}

fn validate_node(cmd: &Command, path: &mut Vec<String>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let here = path.join(".");

    errors.extend(validate_options(&cmd.opts, &here));
    if !errors.is_empty() {
        return errors;
    }

    for o in cmd.args.iter().chain(&cmd.env) {
        errors.extend(validate_descriptor(o, &here));
        if !errors.is_empty() {
            return errors;
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for sub in &cmd.commands {
        let name = sub.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::EmptyCommandName(here));
            return errors;
        }

        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateSubcommand(format!("{here}.{name}")));
            return errors;
        }

        path.push(name.to_string());
        errors.extend(validate_node(sub, path));
        path.pop();
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_options(opts: &[O], here: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for o in opts {
        errors.extend(validate_descriptor(o, here));
        if !errors.is_empty() {
            return errors;
        }

        for name in o.names() {
            if !seen.insert(name) {
                errors.push(ValidationError::DuplicateOptionName(format!("{here}: {name}")));
                return errors;
            }
        }
    }

    errors
}

fn validate_descriptor(o: &O, here: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if o.names().any(|n| n.trim().is_empty()) {
        errors.push(ValidationError::EmptyName(format!("{here}: {:?}", o.name)));
        return errors;
    }

    if let Err(err) = o.parser() {
        errors.push(err);
    }

    errors
}

#[cfg(test)]
mod tests {
    use crate::ValueType;

    use super::*;

    #[test]
    fn test_validate_accepts_valid_tree() {
        let root = Command::new("app")
            .with_opt(O::new("depth", ValueType::Integer).required())
            .with_opt(O::new("verbose,v", ValueType::Bool))
            .with_arg(O::new("query", ValueType::String))
            .with_env(O::new("API_KEY", ValueType::String))
            .with_subcommand(Command::new("help"))
            .with_subcommand(Command::new("flooz").with_subcommand(Command::new("blarg")));

        assert!(validate_command(&root).is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_name_segment() {
        let root = Command::new("app").with_opt(O::new("verbose,", ValueType::Bool));
        assert_eq!(
            validate_command(&root),
            vec![ValidationError::EmptyName("app: \"verbose,\"".to_string())]
        );
    }

    #[test]
    fn test_validate_rejects_nested_duplicate_subcommand() {
        let root = Command::new("app").with_subcommand(
            Command::new("remote")
                .with_subcommand(Command::new("add"))
                .with_subcommand(Command::new("add")),
        );
        assert_eq!(
            validate_command(&root),
            vec![ValidationError::DuplicateSubcommand("app.remote.add".to_string())]
        );
    }

    #[test]
    fn test_validate_rejects_empty_subcommand_name() {
        let root = Command::new("app").with_subcommand(Command::new("  "));
        assert_eq!(
            validate_command(&root),
            vec![ValidationError::EmptyCommandName("app".to_string())]
        );
    }

    #[test]
    fn test_validate_rejects_unsupported_type() {
        let root = Command::new("app")
            .with_subcommand(Command::new("tls").with_opt(O::new("cert", ValueType::Custom("Cert".into()))));
        assert_eq!(
            validate_command(&root),
            vec![ValidationError::UnsupportedType("cert".to_string())]
        );
    }

    #[test]
    fn test_same_option_name_on_different_commands_is_fine() {
        let root = Command::new("app")
            .with_opt(O::new("verbose,v", ValueType::Bool))
            .with_subcommand(Command::new("sub").with_opt(O::new("verbose,v", ValueType::Bool)));
        assert!(validate_command(&root).is_empty());
    }
}
