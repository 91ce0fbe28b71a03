// ── Platform capability boundaries ──
//
// The radio subsystem, location provider, and interface table live
// outside this crate. Each is a trait the pipeline consumes; every
// method is infallible by contract -- missing capability yields an
// empty pull or `None`, never an error.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use crate::model::{LocationSample, RawCellRecord};

/// The device radio subsystem.
pub trait RadioSource: Send + Sync {
    /// Pull the current per-technology cell records. An empty vec means
    /// no capability or no coverage; both are normal.
    fn read_cell_records(&self) -> Vec<RawCellRecord>;

    /// The platform's display-info override flag (NSA/advanced NR
    /// indication delivered out of band from the record pull).
    fn display_override_is_5g(&self) -> bool {
        false
    }

    /// Whether the active data/voice network type reports NR.
    fn active_network_is_5g(&self) -> bool {
        false
    }

    /// Network operator name, when readable.
    fn carrier_name(&self) -> Option<String> {
        None
    }
}

/// The device location provider.
pub trait LocationSource: Send + Sync {
    /// The most recent fix, if any. Non-blocking; possibly stale.
    fn last_known_location(&self) -> Option<LocationSample>;
}

/// The device network-interface table, consumed by the
/// interface-derivation discovery strategy.
pub trait InterfaceSource: Send + Sync {
    /// Non-loopback IPv4 addresses assigned to this device.
    fn local_ipv4_addresses(&self) -> Vec<Ipv4Addr>;
}

// ── Default system implementation ────────────────────────────────────

/// [`InterfaceSource`] backed by the OS routing table: connecting a UDP
/// socket (no packets are sent) reveals the address the kernel would
/// source traffic from.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn local_ipv4_addresses(&self) -> Vec<Ipv4Addr> {
        routed_source_address().into_iter().collect()
    }
}

fn routed_source_address() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind(("0.0.0.0", 0)).ok()?;
    socket.connect(("8.8.8.8", 53)).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(v4) if !v4.is_loopback() && !v4.is_unspecified() => Some(v4),
        _ => None,
    }
}

// ── Test/offline sources ─────────────────────────────────────────────

/// A radio source with nothing to report. Useful for offline operation
/// and as a base for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRadio;

impl RadioSource for NoRadio {
    fn read_cell_records(&self) -> Vec<RawCellRecord> {
        Vec::new()
    }
}

/// A location source with no fix.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationSource for NoLocation {
    fn last_known_location(&self) -> Option<LocationSample> {
        None
    }
}

/// An interface table with no addresses (skips the interface-derivation
/// strategy entirely).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterfaces;

impl InterfaceSource for NoInterfaces {
    fn local_ipv4_addresses(&self) -> Vec<Ipv4Addr> {
        Vec::new()
    }
}
