//! `cellwatch run`: discover a server and report until interrupted.

use std::sync::Arc;

use owo_colors::OwoColorize;
use tracing::debug;

use cellwatch_core::capabilities::{LocationSource, NoLocation, NoRadio, RadioSource};
use cellwatch_core::{DiscoveryOutcome, Monitor, SystemInterfaces};

use crate::cli::{GlobalOpts, RunArgs};
use crate::error::CliError;
use crate::output;
use crate::sources::{FixedLocation, ScriptedRadio};

pub async fn handle(args: RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = super::build_monitor_config(global, args.interval)?;
    debug!(device_id = %config.device_id, "monitor configuration resolved");

    let radio: Arc<dyn RadioSource> = match &args.records {
        Some(path) => Arc::new(ScriptedRadio::from_json_file(path)?),
        None => Arc::new(NoRadio),
    };

    let location: Arc<dyn LocationSource> = match (args.latitude, args.longitude) {
        (Some(lat), Some(lon)) => Arc::new(FixedLocation::new(lat, lon, args.accuracy)),
        _ => Arc::new(NoLocation),
    };

    let monitor = Monitor::new(config, radio, location, Arc::new(SystemInterfaces))?;

    eprintln!("discovering reporting server...");
    match monitor.discover().await {
        DiscoveryOutcome::Resolved(endpoint) => {
            eprintln!("server: {}", endpoint.to_string().green());
        }
        DiscoveryOutcome::Exhausted => {
            // Degraded offline mode: metrics still compute locally and
            // every cycle reports as skipped.
            eprintln!("{}", "no server found -- monitoring offline".yellow());
        }
    }

    monitor.start().await;
    let mut reports = monitor.reports();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = reports.changed() => {
                if changed.is_err() {
                    break;
                }
                let report = reports.borrow_and_update().clone();
                if let Some(report) = report {
                    println!("{}", output::status_line(&report));
                }
            }
        }
    }

    eprintln!("stopping...");
    monitor.stop().await;
    Ok(())
}
