// ── Discovery orchestration ──
//
// Walks the candidate strategies in priority order, probing each batch
// with bounded parallelism. The first successful probe wins (ties broken
// by completion order) and cancels every sibling in flight. A strategy
// that exhausts falls through to the next; when everything is exhausted
// the session runs offline until an explicit re-discovery.

pub mod candidates;

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{Semaphore, watch};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use cellwatch_api::{Endpoint, probe};

use crate::capabilities::InterfaceSource;
use crate::config::MonitorConfig;

pub use candidates::{LIKELY_HOST_OCTETS, Strategy, candidates_for};

/// Observable discovery state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryState {
    Idle,
    Scanning(Strategy),
    Resolved(Endpoint),
    /// Every strategy exhausted. Not terminal for the process: a later
    /// explicit re-discovery restarts at `Idle`.
    Exhausted,
}

/// Result of one discovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    Resolved(Endpoint),
    Exhausted,
}

/// One discovery session: a shared probe client plus observable state.
pub struct Discovery {
    http: reqwest::Client,
    config: Arc<MonitorConfig>,
    state: watch::Sender<DiscoveryState>,
}

impl Discovery {
    pub fn new(config: Arc<MonitorConfig>, http: reqwest::Client) -> Self {
        let (state, _) = watch::channel(DiscoveryState::Idle);
        Self {
            http,
            config,
            state,
        }
    }

    /// Subscribe to state transitions.
    pub fn state(&self) -> watch::Receiver<DiscoveryState> {
        self.state.subscribe()
    }

    /// Run the full strategy ladder once.
    ///
    /// `cached` is a previously-successful endpoint, tried first. Each
    /// candidate is probed at most once per run; total time is bounded
    /// by the per-strategy batch sizes times the probe timeout.
    pub async fn run(
        &self,
        interfaces: &dyn InterfaceSource,
        cached: Option<Endpoint>,
    ) -> DiscoveryOutcome {
        let config = &self.config;
        let mut tried: HashSet<Endpoint> = HashSet::new();

        for strategy in Strategy::ORDER {
            let batch: Vec<Endpoint> =
                candidates_for(strategy, config, cached.as_ref(), interfaces)
                    .into_iter()
                    .filter(|ep| tried.insert(ep.clone()))
                    .collect();

            if batch.is_empty() {
                debug!(strategy = strategy.label(), "no candidates, skipping");
                continue;
            }

            let _ = self.state.send(DiscoveryState::Scanning(strategy));
            debug!(
                strategy = strategy.label(),
                candidates = batch.len(),
                "scanning"
            );

            if let Some(winner) = self.scan_batch(batch).await {
                info!(endpoint = %winner, strategy = strategy.label(), "endpoint resolved");
                let _ = self.state.send(DiscoveryState::Resolved(winner.clone()));
                return DiscoveryOutcome::Resolved(winner);
            }
        }

        // Last resort: one slower retry of the top priority candidate,
        // in case the scan timeout was too tight for a loaded server.
        if let Some(first) = candidates_for(Strategy::PriorityList, config, cached.as_ref(), interfaces)
            .into_iter()
            .next()
        {
            debug!(candidate = %first, "last-resort retry with extended timeout");
            if probe(
                &self.http,
                &first,
                &config.health_path,
                config.retry_probe_timeout,
            )
            .await
            {
                info!(endpoint = %first, "endpoint resolved on retry");
                let _ = self.state.send(DiscoveryState::Resolved(first.clone()));
                return DiscoveryOutcome::Resolved(first);
            }
        }

        info!("discovery exhausted -- running offline");
        let _ = self.state.send(DiscoveryState::Exhausted);
        DiscoveryOutcome::Exhausted
    }

    /// Probe one batch with bounded parallelism, first success wins.
    ///
    /// The winning probe cancels all siblings: queued probes never
    /// start, in-flight probes are dropped mid-request.
    async fn scan_batch(&self, batch: Vec<Endpoint>) -> Option<Endpoint> {
        let cancel = CancellationToken::new();
        let semaphore = Arc::new(Semaphore::new(self.config.probe_concurrency.max(1)));
        let mut probes = JoinSet::new();

        for candidate in batch {
            let http = self.http.clone();
            let cancel = cancel.clone();
            let semaphore = Arc::clone(&semaphore);
            let health_path = self.config.health_path.clone();
            let timeout = self.config.probe_timeout;

            probes.spawn(async move {
                let _permit = tokio::select! {
                    biased;
                    () = cancel.cancelled() => return None,
                    permit = semaphore.acquire_owned() => permit.ok()?,
                };

                let reachable = tokio::select! {
                    biased;
                    () = cancel.cancelled() => false,
                    hit = probe(&http, &candidate, &health_path, timeout) => hit,
                };

                // Cancel before the permit is released so a queued
                // sibling can never slip in behind the winner.
                if reachable {
                    cancel.cancel();
                }
                reachable.then_some(candidate)
            });
        }

        while let Some(joined) = probes.join_next().await {
            if let Ok(Some(winner)) = joined {
                probes.abort_all();
                return Some(winner);
            }
        }

        None
    }
}
