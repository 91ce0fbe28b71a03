//! Command dispatch.

pub mod config_cmd;
pub mod discover;
pub mod probe;
pub mod run;

use clap::CommandFactory;
use clap_complete::generate;

use cellwatch_core::MonitorConfig;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Run(args) => run::handle(args, global).await,
        Command::Discover => discover::handle(global).await,
        Command::Probe(args) => probe::handle(&args, global).await,
        Command::Config(args) => config_cmd::handle(&args, global),
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "cellwatch", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Build a `MonitorConfig` from the config file, profile, and CLI
/// overrides.
pub(crate) fn build_monitor_config(
    global: &GlobalOpts,
    interval_override: Option<u64>,
) -> Result<MonitorConfig, CliError> {
    let config = cellwatch_config::load_config_or_default();
    let mut profile = config.resolve_profile(global.profile.as_deref())?;

    if let Some(server) = &global.server {
        profile.server = Some(server.clone());
    }
    if let Some(port) = global.port {
        profile.port = Some(port);
    }
    if global.https {
        profile.https = Some(true);
    }
    if let Some(secs) = interval_override {
        profile.interval_secs = Some(secs);
    }

    Ok(config.to_monitor_config(&profile)?)
}
