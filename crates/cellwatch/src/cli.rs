//! Command-line surface.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "cellwatch",
    version,
    about = "Discovers a reporting server and ships radio-signal telemetry to it"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use.
    #[arg(short, long, global = true, env = "CELLWATCH_PROFILE")]
    pub profile: Option<String>,

    /// Known server host, tried ahead of discovery.
    #[arg(long, global = true, env = "CELLWATCH_SERVER")]
    pub server: Option<String>,

    /// Reporting port on every candidate.
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Probe and submit over HTTPS.
    #[arg(long, global = true)]
    pub https: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Discover a server and report continuously until interrupted.
    Run(RunArgs),

    /// Run discovery once and print the resolved endpoint.
    Discover,

    /// Probe a single address for reachability.
    Probe(ProbeArgs),

    /// Manage the configuration file.
    Config(ConfigArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Seconds between reporting cycles (overrides profile).
    #[arg(long)]
    pub interval: Option<u64>,

    /// JSON file of raw cell-record snapshots to replay through the
    /// pipeline (one array of records per cycle).
    #[arg(long, value_name = "FILE")]
    pub records: Option<PathBuf>,

    /// Fixed latitude to report.
    #[arg(long, requires = "longitude", allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    /// Fixed longitude to report.
    #[arg(long, requires = "latitude", allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Horizontal accuracy for the fixed location, in meters.
    #[arg(long, default_value_t = 10.0)]
    pub accuracy: f64,
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Address to probe, as `host` or `host:port`.
    pub address: String,

    /// Probe timeout in milliseconds.
    #[arg(long, default_value_t = 2000)]
    pub timeout_ms: u64,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Write a starter config file.
    Init,
    /// Print the effective configuration.
    Show,
    /// Print the config file path.
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
