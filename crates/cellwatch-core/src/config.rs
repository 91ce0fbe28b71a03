// ── Runtime monitor configuration ──
//
// Describes *how* to discover and report: ports, paths, timing, device
// identity. Built by the CLI (from profiles/flags) and handed in -- core
// never reads config files.

use std::time::Duration;

use cellwatch_api::{Scheme, TransportConfig};

/// Configuration for one monitoring session.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Stable device identity used in submission routes.
    pub device_id: String,
    /// Hardware model string sent at registration.
    pub device_model: String,
    /// OS/platform version string sent at registration.
    pub platform_version: String,
    /// Probe and submit over HTTPS instead of HTTP.
    pub https: bool,
    /// Port every candidate is probed on.
    pub port: u16,
    /// Health route used by the reachability probe.
    pub health_path: String,
    /// Fixed delay between the end of one cycle and the start of the next.
    pub interval: Duration,
    /// Per-candidate timeout while scanning.
    pub probe_timeout: Duration,
    /// Timeout for the single last-resort retry of the top priority
    /// candidate.
    pub retry_probe_timeout: Duration,
    /// Hard timeout on report submissions.
    pub submit_timeout: Duration,
    /// Concurrent probes per candidate batch.
    pub probe_concurrency: usize,
    /// Hosts tried first, in order, before any derived strategy.
    pub priority_hosts: Vec<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            device_id: uuid::Uuid::new_v4().to_string(),
            device_model: "unknown".into(),
            platform_version: std::env::consts::OS.into(),
            https: false,
            port: 5000,
            health_path: "/api/health".into(),
            interval: Duration::from_secs(3),
            probe_timeout: Duration::from_secs(1),
            retry_probe_timeout: Duration::from_secs(5),
            submit_timeout: Duration::from_secs(10),
            probe_concurrency: 12,
            // Loopback plus the conventional emulator-host address.
            priority_hosts: vec!["127.0.0.1".into(), "10.0.2.2".into()],
        }
    }
}

impl MonitorConfig {
    pub fn scheme(&self) -> Scheme {
        if self.https { Scheme::Https } else { Scheme::Http }
    }

    /// The transport settings for the submission path.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.submit_timeout,
            ..TransportConfig::default()
        }
    }
}
