//! Built-in `help` and `completion` commands.
//!
//! Both are plain [`Command`]s; mount them wherever they belong in a tree.

use std::io::Write;

use cmdtree_core::{Command, CommandError, Context, HelpSubject};

/// A `help` command.
///
/// Its remaining arguments name a command path below the root (`app help
/// remote add`); the helper's text for that command is written to the
/// output. Fails with [`CommandError::UnknownCommand`] for names that do not
/// resolve and with [`CommandError::NoHelper`] when the commander has no
/// helper.
///
/// # Examples
///
/// ```
/// use cmdtree_commander::{BasicHelper, Commander, help_command};
/// use cmdtree_core::{Command, Context, Pipeline, SharedBuffer};
/// use cmdtree_getopt::Getopt;
///
/// let root = Command::new("app")
///     .with_subcommand(help_command())
///     .with_subcommand(Command::new("remote").with_description("Manage remotes"));
///
/// let out = SharedBuffer::default();
/// Commander::new(Getopt::new(), BasicHelper)
///     .execute(&root, Context::new(["help", "remote"]).with_output(out.clone()))
///     .unwrap();
/// assert!(out.contents().starts_with("usage: app remote"));
/// ```
pub fn help_command() -> Command {
    Command::new("help")
        .with_description("Show help for a command")
        .with_run(|mut ctx| {
            let text = render_help(&ctx)?;
            ctx.out.write_all(text.as_bytes())?;
            Ok(())
        })
}

fn render_help(ctx: &Context<'_>) -> Result<String, CommandError> {
    let pipeline = ctx.pipeline.as_ref().ok_or(CommandError::NoHelper)?;
    let helper = pipeline.helper().ok_or(CommandError::NoHelper)?;
    let root = ctx.root().ok_or(CommandError::NoHelper)?;

    let mut subject = HelpSubject::root(root);
    for name in &ctx.args {
        let child = subject
            .command
            .find_subcommand(name)
            .ok_or_else(|| CommandError::UnknownCommand {
                name: name.clone(),
                parent: subject.path.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join("."),
            })?;
        subject.path.push(child);
        subject.command = child;
    }

    Ok(helper.help(&subject))
}

/// A `completion` command.
///
/// Run normally it prints the bash line that registers the program for
/// completion, e.g. `complete -C "app completion" app`. In completion mode
/// the commander answers before dispatch, so the registered command never
/// reaches this handler.
pub fn completion_command() -> Command {
    Command::new("completion")
        .with_description("Print the bash completion setup line")
        .with_run(|mut ctx| {
            let Some(root) = ctx.root() else {
                return Err(CommandError::NotRunnable("completion".to_string()).into());
            };
            let invoke = ctx.path_string(" ");
            writeln!(ctx.out, "complete -C {invoke:?} {}", root.name)?;
            Ok(())
        })
}
