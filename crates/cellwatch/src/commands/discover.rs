//! `cellwatch discover`: one-shot discovery.

use std::sync::Arc;

use cellwatch_core::capabilities::{NoLocation, NoRadio};
use cellwatch_core::{DiscoveryOutcome, Monitor, SystemInterfaces};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let config = super::build_monitor_config(global, None)?;
    let monitor = Monitor::new(
        config,
        Arc::new(NoRadio),
        Arc::new(NoLocation),
        Arc::new(SystemInterfaces),
    )?;

    match monitor.discover().await {
        DiscoveryOutcome::Resolved(endpoint) => {
            println!("{endpoint}");
            Ok(())
        }
        DiscoveryOutcome::Exhausted => Err(CliError::NoServerFound),
    }
}
