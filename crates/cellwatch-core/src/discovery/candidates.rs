// ── Candidate generation ──
//
// Three independent strategies, each an ordered, finite batch of
// endpoint candidates. The orchestrator walks them in fixed order and
// dedups across batches, so a candidate is only ever probed once per
// discovery run.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

use cellwatch_api::Endpoint;

use crate::capabilities::InterfaceSource;
use crate::config::MonitorConfig;

/// Last octets where a reporting server is most likely to sit within
/// any /24: gateway, low static range, and the conventional top/bottom
/// assignments.
pub const LIKELY_HOST_OCTETS: [u8; 7] = [1, 10, 35, 50, 100, 101, 254];

/// Conventional private subnets probed when the device cannot introspect
/// its own interfaces (cellular-only, VPN'd, sandboxed).
const COMMON_PRIVATE_SUBNETS: [Ipv4Addr; 5] = [
    Ipv4Addr::new(192, 168, 0, 0),
    Ipv4Addr::new(192, 168, 1, 0),
    Ipv4Addr::new(192, 168, 23, 0),
    Ipv4Addr::new(10, 0, 0, 0),
    Ipv4Addr::new(172, 16, 0, 0),
];

/// Discovery strategies in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Fixed hand-tuned list: cached winner, loopback, emulator host,
    /// configured extras. Near-zero cost, highest hit-rate in
    /// development setups.
    PriorityList,
    /// /24 subnets derived from the device's own interface addresses.
    LocalInterfaces,
    /// Conventional private ranges the device cannot see directly.
    CommonRanges,
}

impl Strategy {
    pub const ORDER: [Self; 3] = [Self::PriorityList, Self::LocalInterfaces, Self::CommonRanges];

    pub fn label(self) -> &'static str {
        match self {
            Self::PriorityList => "priority list",
            Self::LocalInterfaces => "local interfaces",
            Self::CommonRanges => "common ranges",
        }
    }
}

/// Generate the candidate batch for one strategy.
///
/// `cached` is a previously-successful endpoint (tried first within the
/// priority list). Batches are ordered but not deduplicated against each
/// other -- the orchestrator tracks what it already probed.
pub fn candidates_for(
    strategy: Strategy,
    config: &MonitorConfig,
    cached: Option<&Endpoint>,
    interfaces: &dyn InterfaceSource,
) -> Vec<Endpoint> {
    match strategy {
        Strategy::PriorityList => priority_candidates(config, cached),
        Strategy::LocalInterfaces => {
            interface_candidates(&interfaces.local_ipv4_addresses(), config)
        }
        Strategy::CommonRanges => common_range_candidates(config),
    }
}

fn priority_candidates(config: &MonitorConfig, cached: Option<&Endpoint>) -> Vec<Endpoint> {
    let mut batch = Vec::with_capacity(config.priority_hosts.len() + 1);
    if let Some(ep) = cached {
        batch.push(ep.clone());
    }
    for host in &config.priority_hosts {
        let ep = Endpoint::new(config.scheme(), host.clone(), config.port);
        if !batch.contains(&ep) {
            batch.push(ep);
        }
    }
    batch
}

fn interface_candidates(addresses: &[Ipv4Addr], config: &MonitorConfig) -> Vec<Endpoint> {
    let mut batch = Vec::new();
    for addr in addresses {
        if addr.is_loopback() {
            continue;
        }
        // The containing /24, host bits cleared.
        let Ok(subnet) = Ipv4Net::new(*addr, 24) else {
            continue;
        };
        push_subnet_hosts(&mut batch, subnet.network(), config);
    }
    batch
}

fn common_range_candidates(config: &MonitorConfig) -> Vec<Endpoint> {
    let mut batch = Vec::new();
    for base in COMMON_PRIVATE_SUBNETS {
        push_subnet_hosts(&mut batch, base, config);
    }
    batch
}

fn push_subnet_hosts(batch: &mut Vec<Endpoint>, network: Ipv4Addr, config: &MonitorConfig) {
    let [a, b, c, _] = network.octets();
    for octet in LIKELY_HOST_OCTETS {
        let host = Ipv4Addr::new(a, b, c, octet);
        batch.push(Endpoint::new(config.scheme(), host.to_string(), config.port));
    }
}
