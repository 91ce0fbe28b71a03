//! `cellwatch probe`: test one address for reachability.

use std::time::Duration;

use owo_colors::OwoColorize;

use cellwatch_api::{Endpoint, probe_detail};

use crate::cli::{GlobalOpts, ProbeArgs};
use crate::error::CliError;

pub async fn handle(args: &ProbeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = super::build_monitor_config(global, None)?;

    let (host, port) = parse_address(&args.address, config.port)?;
    let candidate = Endpoint::new(config.scheme(), host, port);

    let client = config
        .transport()
        .build_client()
        .map_err(cellwatch_core::CoreError::from)?;

    let outcome = probe_detail(
        &client,
        &candidate,
        &config.health_path,
        Duration::from_millis(args.timeout_ms),
    )
    .await;

    let status = outcome
        .status
        .map_or_else(|| "no response".into(), |s| format!("HTTP {s}"));

    if outcome.reachable {
        println!(
            "{candidate} {} ({status}, {:?})",
            "reachable".green(),
            outcome.latency
        );
        Ok(())
    } else {
        println!(
            "{candidate} {} ({status}, {:?})",
            "unreachable".red(),
            outcome.latency
        );
        Err(CliError::Unreachable {
            address: candidate.to_string(),
        })
    }
}

/// Split `host[:port]`, defaulting the port from config.
fn parse_address(address: &str, default_port: u16) -> Result<(String, u16), CliError> {
    match address.rsplit_once(':') {
        None => Ok((address.to_owned(), default_port)),
        Some((host, port)) => {
            let port = port.parse().map_err(|_| CliError::Validation {
                field: "address".into(),
                reason: format!("invalid port in '{address}'"),
            })?;
            Ok((host.to_owned(), port))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_takes_the_default_port() {
        assert_eq!(
            parse_address("192.168.1.35", 5000).unwrap(),
            ("192.168.1.35".to_owned(), 5000)
        );
    }

    #[test]
    fn explicit_port_wins() {
        assert_eq!(
            parse_address("192.168.1.35:8080", 5000).unwrap(),
            ("192.168.1.35".to_owned(), 8080)
        );
    }

    #[test]
    fn garbage_port_is_a_usage_error() {
        assert!(parse_address("host:notaport", 5000).is_err());
    }
}
