//! Help subjects and the serializable command outline.
//!
//! Help rendering is pluggable: a [`Helper`] receives a [`HelpSubject`] and
//! returns text. [`CommandOutline`] is a plain-data snapshot of a command
//! subtree that renderers and tooling can work from without touching
//! handlers or parsers.

use serde::{Deserialize, Serialize};

use crate::{Command, O, ValueType};

/// A node of the command tree that is subject to a help query.
#[derive(Debug, Clone)]
pub struct HelpSubject<'a> {
    /// The command help is rendered for.
    pub command: &'a Command,
    /// Commands from the root down to `command`, inclusive.
    pub path: Vec<&'a Command>,
}

impl<'a> HelpSubject<'a> {
    /// A subject for the root command itself.
    pub fn root(command: &'a Command) -> Self {
        Self {
            command,
            path: vec![command],
        }
    }
}

/// Renders help text for commands.
pub trait Helper: Send + Sync {
    fn help(&self, subject: &HelpSubject<'_>) -> String;
}

/// Outline of a single value descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueOutline {
    /// Canonical name.
    pub name: String,
    /// Alternate names, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub value_type: ValueType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&O> for ValueOutline {
    fn from(o: &O) -> Self {
        Self {
            name: o.canonical_name().to_string(),
            aliases: o.names().skip(1).map(String::from).collect(),
            value_type: o.value_type.clone(),
            required: o.require,
            description: o.description.clone(),
        }
    }
}

/// Outline of a command subtree.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, O, ValueType};
///
/// let root = Command::new("app")
///     .with_opt(O::new("verbose,v", ValueType::Bool))
///     .with_subcommand(Command::new("help").with_run(|_| Ok(())));
///
/// let outline = root.outline();
/// assert_eq!(outline.options[0].aliases, vec!["v"]);
/// assert!(!outline.runnable);
/// assert!(outline.subcommands[0].runnable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutline {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub runnable: bool,
    pub options: Vec<ValueOutline>,
    pub arguments: Vec<ValueOutline>,
    pub environment: Vec<ValueOutline>,
    pub subcommands: Vec<CommandOutline>,
}

impl Command {
    /// Builds an outline of this command and everything below it.
    pub fn outline(&self) -> CommandOutline {
        CommandOutline {
            name: self.name.clone(),
            description: self.description.clone(),
            runnable: self.is_runnable(),
            options: self.opts.iter().map(ValueOutline::from).collect(),
            arguments: self.args.iter().map(ValueOutline::from).collect(),
            environment: self.env.iter().map(ValueOutline::from).collect(),
            subcommands: self.commands.iter().map(Command::outline).collect(),
        }
    }
}
