// ── Reachability probe ──
//
// One candidate, one GET, one bool. A reachable server that lacks the
// health route still answers 404, which proves the host is live and
// accepting connections -- so 404 counts as success. Everything else
// (refused, timeout, malformed response) is a plain `false`; probe
// failures never propagate as errors.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::endpoint::Endpoint;

/// Floor and ceiling for caller-supplied probe timeouts. Scanning uses
/// short timeouts, a single known-address retry may use the top end.
pub const MIN_PROBE_TIMEOUT: Duration = Duration::from_millis(100);
pub const MAX_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// What a single probe observed, for callers that want more than a bool.
#[derive(Debug, Clone, Copy)]
pub struct ProbeOutcome {
    pub reachable: bool,
    /// HTTP status, when a response arrived at all.
    pub status: Option<u16>,
    pub latency: Duration,
}

/// Test one candidate endpoint for reachability.
///
/// Success iff `GET {candidate}{health_path}` answers 2xx or exactly 404
/// within `timeout`.
pub async fn probe(
    client: &reqwest::Client,
    candidate: &Endpoint,
    health_path: &str,
    timeout: Duration,
) -> bool {
    probe_detail(client, candidate, health_path, timeout)
        .await
        .reachable
}

/// [`probe`] with the observed status and latency attached.
pub async fn probe_detail(
    client: &reqwest::Client,
    candidate: &Endpoint,
    health_path: &str,
    timeout: Duration,
) -> ProbeOutcome {
    let timeout = timeout.clamp(MIN_PROBE_TIMEOUT, MAX_PROBE_TIMEOUT);
    let started = Instant::now();

    let Ok(url) = candidate.with_path(health_path) else {
        return ProbeOutcome {
            reachable: false,
            status: None,
            latency: started.elapsed(),
        };
    };

    let status = match client.get(url).timeout(timeout).send().await {
        Ok(resp) => Some(resp.status().as_u16()),
        Err(e) => {
            trace!(candidate = %candidate, error = %e, "probe failed");
            None
        }
    };

    let reachable = matches!(status, Some(s) if (200..300).contains(&s) || s == 404);

    ProbeOutcome {
        reachable,
        status,
        latency: started.elapsed(),
    }
}
