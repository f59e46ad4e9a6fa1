mod app;
mod config;
mod types;
mod unansi;

use cmdtree_commander::{BasicHelper, Commander};
use cmdtree_core::{Context, EnvSource, Pipeline};
use cmdtree_getopt::Getopt;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Variable holding the log filter, e.g. `CMDTREE_LOG=debug`.
const LOG_ENV: &str = "CMDTREE_LOG";

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let defaults = match config::load_default(&EnvSource::Process) {
        Ok(defaults) => defaults,
        Err(err) => {
            warn!(error = %err, "ignoring default configuration");
            None
        }
    };

    let root = app::root(defaults);
    let commander = Commander::new(Getopt::new(), BasicHelper);

    if let Err(err) = Context::os().and_then(|ctx| commander.execute(&root, ctx)) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
