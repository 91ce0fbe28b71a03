// ── Monitor ──
//
// Full lifecycle for one reporting session: discovery, the fixed-delay
// reporting cycle, and observable status. The cycle task owns the
// CPU-bound pipeline (read -> normalize -> arbitrate); submissions run
// as detached tasks so a slow server never delays the next tick, and
// stopping never joins an in-flight request.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use cellwatch_api::{Endpoint, TelemetryClient};

use crate::arbiter::{ArbiterInputs, TechnologyArbiter};
use crate::capabilities::{InterfaceSource, LocationSource, RadioSource};
use crate::config::MonitorConfig;
use crate::convert;
use crate::discovery::{Discovery, DiscoveryOutcome, DiscoveryState};
use crate::error::CoreError;
use crate::model::{CellMetrics, LocationSample, Technology};
use crate::normalize::normalize;

// ── Observable state ─────────────────────────────────────────────────

/// Reporting loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Stopped,
    Running,
}

/// What happened to one cycle's submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// No endpoint resolved; metrics were computed but not shipped.
    Skipped,
    Sent,
    /// Network error or server rejection. The next cycle retries with
    /// fresh data; nothing is queued.
    Failed,
}

/// Per-cycle status, published when the cycle's submission settles
/// (immediately, for skipped cycles).
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    pub metrics: CellMetrics,
    pub submission: SubmissionStatus,
}

// ── Monitor ──────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<MonitorInner>`. Owns the resolved
/// endpoint, the latest location fix, and the cycle task; each shared
/// value has a single writer and is swapped atomically.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: Arc<MonitorConfig>,
    radio: Arc<dyn RadioSource>,
    location: Arc<dyn LocationSource>,
    interfaces: Arc<dyn InterfaceSource>,
    http: reqwest::Client,
    discovery: Discovery,
    endpoint: ArcSwapOption<Endpoint>,
    client: ArcSwapOption<TelemetryClient>,
    last_location: ArcSwapOption<LocationSample>,
    state: watch::Sender<MonitorState>,
    reports: watch::Sender<Option<CycleReport>>,
    run: Mutex<Option<RunHandle>>,
}

struct RunHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Monitor {
    /// Create a monitor from configuration and platform capabilities.
    /// Does not probe or submit anything -- call
    /// [`discover()`](Self::discover) and [`start()`](Self::start).
    pub fn new(
        config: MonitorConfig,
        radio: Arc<dyn RadioSource>,
        location: Arc<dyn LocationSource>,
        interfaces: Arc<dyn InterfaceSource>,
    ) -> Result<Self, CoreError> {
        let config = Arc::new(config);
        let http = config.transport().build_client().map_err(CoreError::from)?;
        let discovery = Discovery::new(Arc::clone(&config), http.clone());
        let (state, _) = watch::channel(MonitorState::Stopped);
        let (reports, _) = watch::channel(None);

        Ok(Self {
            inner: Arc::new(MonitorInner {
                config,
                radio,
                location,
                interfaces,
                http,
                discovery,
                endpoint: ArcSwapOption::empty(),
                client: ArcSwapOption::empty(),
                last_location: ArcSwapOption::empty(),
                state,
                reports,
                run: Mutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    // ── Discovery ────────────────────────────────────────────────────

    /// Resolve a reporting endpoint, trying a previously-resolved one
    /// first. On success the endpoint is cached and the device is
    /// registered (idempotent upsert; a registration failure is logged,
    /// not fatal).
    pub async fn discover(&self) -> DiscoveryOutcome {
        let hint = self.inner.endpoint.load_full().map(|ep| (*ep).clone());
        self.run_discovery(hint).await
    }

    /// Drop the cached endpoint and resolve again, keeping the old
    /// winner as a priority hint. For explicit network-mode changes.
    pub async fn rediscover(&self) -> DiscoveryOutcome {
        let hint = self.inner.endpoint.swap(None).map(|ep| (*ep).clone());
        self.inner.client.store(None);
        self.run_discovery(hint).await
    }

    async fn run_discovery(&self, hint: Option<Endpoint>) -> DiscoveryOutcome {
        let inner = &self.inner;
        let outcome = inner
            .discovery
            .run(inner.interfaces.as_ref(), hint)
            .await;

        if let DiscoveryOutcome::Resolved(ref endpoint) = outcome {
            inner.endpoint.store(Some(Arc::new(endpoint.clone())));

            let client = TelemetryClient::with_client(
                inner.http.clone(),
                endpoint.clone(),
                inner.config.device_id.clone(),
            );

            let payload =
                convert::register_payload(&inner.config, inner.last_location.load().as_deref());
            if let Err(e) = client.register_device(&payload).await {
                warn!(error = %e, "device registration failed (non-fatal)");
            }

            inner.client.store(Some(Arc::new(client)));
        }

        outcome
    }

    // ── Reporting loop lifecycle ─────────────────────────────────────

    /// Enter `Running`: one immediate cycle, then fixed-delay repeats.
    /// A second call while running is a no-op.
    pub async fn start(&self) {
        let mut run = self.inner.run.lock().await;
        if run.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(cycle_task(Arc::clone(&self.inner), cancel.clone()));
        *run = Some(RunHandle { cancel, task });

        let _ = self.inner.state.send(MonitorState::Running);
        info!(interval = ?self.inner.config.interval, "monitoring started");
    }

    /// Cancel the pending tick and return to `Stopped`. In-flight
    /// submissions are detached and complete (or time out) on their own.
    pub async fn stop(&self) {
        let Some(handle) = self.inner.run.lock().await.take() else {
            return;
        };

        handle.cancel.cancel();
        let _ = handle.task.await;

        let _ = self.inner.state.send(MonitorState::Stopped);
        info!("monitoring stopped");
    }

    // ── State observation ────────────────────────────────────────────

    /// Subscribe to reporting-loop state changes.
    pub fn state(&self) -> watch::Receiver<MonitorState> {
        self.inner.state.subscribe()
    }

    /// Subscribe to per-cycle reports.
    pub fn reports(&self) -> watch::Receiver<Option<CycleReport>> {
        self.inner.reports.subscribe()
    }

    /// Subscribe to discovery state transitions.
    pub fn discovery_state(&self) -> watch::Receiver<DiscoveryState> {
        self.inner.discovery.state()
    }

    /// The currently resolved endpoint, if any.
    pub fn endpoint(&self) -> Option<Endpoint> {
        self.inner.endpoint.load_full().map(|ep| (*ep).clone())
    }

    /// The last location fix the loop has seen, if any.
    pub fn last_location(&self) -> Option<LocationSample> {
        self.inner.last_location.load_full().map(|l| (*l).clone())
    }
}

// ── Cycle task ───────────────────────────────────────────────────────

/// Fixed-delay rescheduling: the delay runs from the end of one cycle's
/// CPU-bound work to the start of the next, never drift-corrected.
async fn cycle_task(inner: Arc<MonitorInner>, cancel: CancellationToken) {
    let mut arbiter = TechnologyArbiter::new();
    let mut cycle: u64 = 0;

    loop {
        cycle += 1;
        run_cycle(&inner, &mut arbiter, cycle);

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(inner.config.interval) => {}
        }
    }
}

/// One cycle: pull records, normalize, arbitrate, sample location, and
/// hand the snapshot to a detached submission task.
fn run_cycle(inner: &Arc<MonitorInner>, arbiter: &mut TechnologyArbiter, cycle: u64) {
    let records = inner.radio.read_cell_records();
    let mut metrics = normalize(&records, Utc::now());

    let inputs = ArbiterInputs {
        display_override_5g: inner.radio.display_override_is_5g(),
        records_contain_nr: records
            .iter()
            .any(|r| r.technology() == Technology::Nr),
        active_network_5g: inner.radio.active_network_is_5g(),
    };
    if let Some(now_5g) = arbiter.update(inputs) {
        info!(is_5g = now_5g, "network technology changed");
    }
    // Consumers only ever see the arbiter's stable flag, not the
    // per-snapshot one.
    metrics.is_5g = arbiter.current();

    let fix = inner.location.last_known_location();
    let fresh_fix = match (&fix, inner.last_location.load().as_deref()) {
        (Some(new), Some(old)) => new.captured_at > old.captured_at,
        (Some(_), None) => true,
        (None, _) => false,
    };
    if let Some(sample) = &fix {
        inner.last_location.store(Some(Arc::new(sample.clone())));
    }

    debug!(
        cycle,
        valid = metrics.is_valid(),
        network = %metrics.network_type,
        "cycle computed"
    );

    let Some(client) = inner.client.load_full() else {
        publish(
            inner,
            CycleReport {
                cycle,
                metrics,
                submission: SubmissionStatus::Skipped,
            },
        );
        return;
    };

    if fresh_fix {
        if let Some(sample) = fix {
            let location_client = Arc::clone(&client);
            tokio::spawn(async move {
                let body = convert::location_report(&sample);
                if let Err(e) = location_client.submit_location(&body).await {
                    warn!(error = %e, "location submission failed");
                }
            });
        }
    }

    let body = convert::signal_report(
        &metrics,
        inner.last_location.load().as_deref(),
        inner.radio.carrier_name(),
        inner.config.https,
    );

    let report_inner = Arc::clone(inner);
    tokio::spawn(async move {
        let submission = match client.submit_signal(&body).await {
            Ok(()) => SubmissionStatus::Sent,
            Err(e) => {
                warn!(cycle, error = %e, "signal submission failed");
                SubmissionStatus::Failed
            }
        };
        publish(
            &report_inner,
            CycleReport {
                cycle,
                metrics,
                submission,
            },
        );
    });
}

fn publish(inner: &Arc<MonitorInner>, report: CycleReport) {
    let _ = inner.reports.send(Some(report));
}
