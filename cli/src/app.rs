//! The example command tree.

use std::io::Write;
use std::net::IpAddr;
use std::time::Duration;

use cmdtree_commander::{completion_command, help_command};
use cmdtree_core::{BoxError, Command, Context, Opt, PredictAnything, PredictSet, ReqOpt};

use crate::config::AppConfigFile;
use crate::types::Cidr;
use crate::unansi;

/// Name of the root command, matching the binary.
pub const APP_NAME: &str = "cmdtree-example";

/// Typed handles for everything the root command declares.
#[derive(Debug, Clone)]
pub struct AppOpts {
    pub path: ReqOpt<String>,
    pub addr: Opt<IpAddr>,
    pub cidr: Opt<Cidr>,
    pub timeout: Opt<Duration>,
    pub verbose: Opt<bool>,
    pub config: Opt<AppConfigFile>,
    pub query: Opt<String>,
    pub debug: Opt<String>,
}

impl AppOpts {
    pub fn new() -> Self {
        Self {
            path: ReqOpt::new("path")
                .with_predictor(PredictSet::new(["good", "bad", "ugly"]))
                .with_description("Where to go"),
            addr: Opt::new("addr").with_description("An IP address"),
            cidr: Opt::new("cidr").with_description("A network, e.g. 10.0.0.0/8"),
            timeout: Opt::new("timeout,t").with_description("How long to wait, e.g. 1m30s"),
            verbose: Opt::new("verbose,v").with_description("Print raw values"),
            config: Opt::new("config").with_description("YAML configuration file"),
            query: Opt::new("query").with_predictor(PredictAnything),
            debug: Opt::new("CMDTREE_DEBUG"),
        }
    }
}

impl Default for AppOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the command tree. `defaults` is the configuration loaded from the
/// default location, used unless `--config` is given.
pub fn root(defaults: Option<AppConfigFile>) -> Command {
    let opts = AppOpts::new();

    Command::new(APP_NAME)
        .with_description("Demonstrates options, arguments, environment bindings and completion")
        .with_opt(&opts.path)
        .with_opt(&opts.addr)
        .with_opt(&opts.cidr)
        .with_opt(&opts.timeout)
        .with_opt(&opts.verbose)
        .with_opt(&opts.config)
        .with_arg(&opts.query)
        .with_env(&opts.debug)
        .with_subcommand(help_command())
        .with_subcommand(completion_command())
        .with_subcommand(schema_command())
        .with_subcommand(unansi::command())
        .with_subcommand(
            Command::new("foo")
                .with_description("A grouping command")
                .with_subcommand(Command::new("baz")),
        )
        .with_subcommand(Command::new("bar"))
        .with_run(move |ctx| run(&opts, defaults.as_ref(), ctx))
}

fn run(opts: &AppOpts, defaults: Option<&AppConfigFile>, mut ctx: Context<'_>) -> Result<(), BoxError> {
    let path = opts.path.get(&ctx);
    writeln!(ctx.out, "path: {path}")?;

    let config = opts.config.get(&ctx).ok();
    match config.as_ref().or(defaults) {
        Some(file) => {
            writeln!(
                ctx.out,
                "config: {} ({} profiles)",
                file.path.display(),
                file.config.profiles.len()
            )?;
            for name in file.config.profiles.keys() {
                let marker = if file.config.active_profile.as_deref() == Some(name.as_str()) {
                    " (active)"
                } else {
                    ""
                };
                writeln!(ctx.out, "  profile: {name}{marker}")?;
            }
        }
        None => writeln!(ctx.out, "config: none")?,
    }

    let addr = opts.addr.get(&ctx).ok();
    if let Some(ip) = addr {
        writeln!(ctx.out, "address: {ip} (loopback: {})", ip.is_loopback())?;
    }

    if let Ok(cidr) = opts.cidr.get(&ctx) {
        writeln!(ctx.out, "network: {cidr}")?;
        if let Some(ip) = addr {
            writeln!(ctx.out, "{ip} in {cidr}: {}", cidr.contains(ip))?;
        }
    }

    if let Ok(timeout) = opts.timeout.get(&ctx) {
        writeln!(ctx.out, "timeout: {timeout:?}")?;
    }

    if let Ok(query) = opts.query.get(&ctx) {
        writeln!(ctx.out, "query: {query}")?;
    }

    if let Ok(debug) = opts.debug.get(&ctx) {
        writeln!(ctx.out, "{}: {debug:?}", opts.debug.name())?;
    }

    if opts.verbose.get(&ctx).unwrap_or(false) {
        let mut raw: Vec<_> = ctx.strings.iter().collect();
        raw.sort();
        for (name, value) in raw {
            writeln!(ctx.out, "  raw {name} = {value:?}")?;
        }
    }

    Ok(())
}

/// `schema`: prints the outline of the whole tree as JSON.
fn schema_command() -> Command {
    Command::new("schema")
        .with_description("Print the command tree as JSON")
        .with_run(|mut ctx| {
            let Some(root) = ctx.root() else {
                return Err("schema needs a resolved command path".into());
            };
            let json = serde_json::to_string_pretty(&root.outline())?;
            writeln!(ctx.out, "{json}")?;
            Ok(())
        })
}
