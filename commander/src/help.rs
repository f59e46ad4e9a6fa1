//! Plain-text default helper.

use cmdtree_core::{HelpSubject, Helper, ValueOutline};

/// Renders usage, options, arguments, subcommands and environment variables
/// as plain text, without colours.
///
/// Required options are listed first.
///
/// # Examples
///
/// ```
/// use cmdtree_commander::BasicHelper;
/// use cmdtree_core::{Command, HelpSubject, Helper, O, ValueType};
///
/// let root = Command::new("app")
///     .with_opt(O::new("verbose,v", ValueType::Bool))
///     .with_opt(O::new("depth", ValueType::Integer).required())
///     .with_arg(O::new("query", ValueType::String));
///
/// let text = BasicHelper.help(&HelpSubject::root(&root));
/// assert!(text.starts_with("usage: app [options] [query]\n"));
/// assert!(text.contains("--depth (required)"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicHelper;

impl Helper for BasicHelper {
    fn help(&self, subject: &HelpSubject<'_>) -> String {
        let outline = subject.command.outline();
        let mut b = String::new();

        let path: Vec<&str> = subject.path.iter().map(|c| c.name.as_str()).collect();
        b.push_str(&format!("usage: {}", path.join(" ")));
        if !outline.options.is_empty() {
            b.push_str(" [options]");
        }
        for arg in &outline.arguments {
            if arg.required {
                b.push_str(&format!(" {}", arg.name));
            } else {
                b.push_str(&format!(" [{}]", arg.name));
            }
        }
        b.push('\n');

        if let Some(desc) = &outline.description {
            b.push_str(&format!("\n{desc}\n"));
        }

        if !outline.options.is_empty() {
            let (required, optional): (Vec<_>, Vec<_>) =
                outline.options.iter().partition(|o| o.required);
            let sorted: Vec<&ValueOutline> = required.into_iter().chain(optional).collect();
            b.push_str("\nOptions:\n");
            section(&mut b, &sorted, |o| {
                let mut spellings = vec![spelling(&o.name)];
                spellings.extend(o.aliases.iter().map(|a| spelling(a)));
                let mut label = spellings.join(", ");
                if o.required {
                    label.push_str(" (required)");
                }
                label
            });
        }

        if !outline.arguments.is_empty() {
            b.push_str("\nArguments:\n");
            let args: Vec<&ValueOutline> = outline.arguments.iter().collect();
            section(&mut b, &args, |o| {
                if o.required {
                    o.name.clone()
                } else {
                    format!("{} (optional)", o.name)
                }
            });
        }

        if !outline.subcommands.is_empty() {
            let names: Vec<&str> = outline.subcommands.iter().map(|c| c.name.as_str()).collect();
            b.push_str(&format!("\nCommands: {}\n", names.join(", ")));
        }

        if !outline.environment.is_empty() {
            b.push_str("\nEnvironment Variables:\n");
            let env: Vec<&ValueOutline> = outline.environment.iter().collect();
            section(&mut b, &env, |o| {
                if o.required {
                    format!("{} (required)", o.name)
                } else {
                    o.name.clone()
                }
            });
        }

        b
    }
}

fn spelling(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}

/// Writes one line per entry: type label padded to the widest, then `label`.
fn section(b: &mut String, entries: &[&ValueOutline], label: impl Fn(&ValueOutline) -> String) {
    let width = entries
        .iter()
        .map(|o| o.value_type.label().len())
        .max()
        .unwrap_or(0);

    for o in entries {
        b.push_str(&format!("  {:<width$}  {}", o.value_type.label(), label(o)));
        if let Some(desc) = &o.description {
            b.push_str(&format!("  {desc}"));
        }
        b.push('\n');
    }
}
