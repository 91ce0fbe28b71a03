// Integration tests for the reporting monitor using wiremock.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::watch;
use tokio::time::timeout;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cellwatch_core::capabilities::{LocationSource, NoInterfaces, NoLocation, RadioSource};
use cellwatch_core::{
    CycleReport, DiscoveryOutcome, LocationSample, LteRecord, Monitor, MonitorConfig,
    MonitorState, NrRecord, RawCellRecord, SubmissionStatus,
};

// ── Test capabilities ───────────────────────────────────────────────

/// Radio source replaying a fixed record set every pull.
struct StaticRadio {
    records: Vec<RawCellRecord>,
}

impl RadioSource for StaticRadio {
    fn read_cell_records(&self) -> Vec<RawCellRecord> {
        self.records.clone()
    }

    fn carrier_name(&self) -> Option<String> {
        Some("TestNet".into())
    }
}

/// Location source with one fix that never updates.
struct FixedLocation {
    sample: LocationSample,
}

impl LocationSource for FixedLocation {
    fn last_known_location(&self) -> Option<LocationSample> {
        Some(self.sample.clone())
    }
}

fn nsa_radio() -> Arc<StaticRadio> {
    Arc::new(StaticRadio {
        records: vec![
            RawCellRecord::Lte(LteRecord::serving(-95)),
            RawCellRecord::Nr(NrRecord::serving(-80)),
        ],
    })
}

fn fix_at(at: DateTime<Utc>) -> Arc<FixedLocation> {
    Arc::new(FixedLocation {
        sample: LocationSample::new(52.52, 13.405, 8.0, at),
    })
}

// ── Helpers ─────────────────────────────────────────────────────────

fn fast_config(server: &MockServer) -> MonitorConfig {
    MonitorConfig {
        device_id: "test-device".into(),
        port: server.address().port(),
        priority_hosts: vec!["127.0.0.1".into()],
        interval: Duration::from_millis(100),
        probe_timeout: Duration::from_millis(300),
        retry_probe_timeout: Duration::from_millis(300),
        ..MonitorConfig::default()
    }
}

async fn mount_ok(server: &MockServer, route: &str) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

async fn mount_health(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

/// Wait for the next published cycle report.
async fn next_report(rx: &mut watch::Receiver<Option<CycleReport>>) -> CycleReport {
    timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("timed out waiting for a cycle report")
        .expect("monitor dropped");
    rx.borrow_and_update()
        .clone()
        .expect("report channel fired without a report")
}

// ── Loop behavior ───────────────────────────────────────────────────

#[tokio::test]
async fn submission_failure_does_not_stop_the_loop() {
    let server = MockServer::start().await;
    mount_health(&server).await;
    mount_ok(&server, "/api/devices/register").await;
    Mock::given(method("POST"))
        .and(path("/api/devices/test-device/signal"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let monitor = Monitor::new(
        fast_config(&server),
        nsa_radio(),
        Arc::new(NoLocation),
        Arc::new(NoInterfaces),
    )
    .unwrap();

    assert!(matches!(
        monitor.discover().await,
        DiscoveryOutcome::Resolved(_)
    ));
    monitor.start().await;

    let mut reports = monitor.reports();
    let first = next_report(&mut reports).await;
    assert_eq!(first.submission, SubmissionStatus::Failed);

    // Tick N failed; ticks N+1, N+2 still execute on schedule.
    let mut last_cycle = first.cycle;
    for _ in 0..2 {
        let report = next_report(&mut reports).await;
        assert!(report.cycle > last_cycle);
        assert_eq!(report.submission, SubmissionStatus::Failed);
        last_cycle = report.cycle;
    }

    monitor.stop().await;
}

#[tokio::test]
async fn unresolved_endpoint_skips_submission_but_still_computes() {
    let monitor = Monitor::new(
        MonitorConfig {
            interval: Duration::from_millis(100),
            ..MonitorConfig::default()
        },
        nsa_radio(),
        Arc::new(NoLocation),
        Arc::new(NoInterfaces),
    )
    .unwrap();

    // No discovery at all: offline mode.
    monitor.start().await;

    let mut reports = monitor.reports();
    let report = next_report(&mut reports).await;

    assert_eq!(report.submission, SubmissionStatus::Skipped);
    assert!(report.metrics.is_valid());
    assert_eq!(report.metrics.signal_strength_4g, -95);
    assert_eq!(report.metrics.signal_strength_5g, -80);
    assert!(report.metrics.is_5g);

    monitor.stop().await;
}

#[tokio::test]
async fn stop_cancels_the_pending_cycle() {
    let monitor = Monitor::new(
        MonitorConfig {
            interval: Duration::from_millis(100),
            ..MonitorConfig::default()
        },
        nsa_radio(),
        Arc::new(NoLocation),
        Arc::new(NoInterfaces),
    )
    .unwrap();

    monitor.start().await;
    let mut reports = monitor.reports();
    next_report(&mut reports).await;
    monitor.stop().await;

    assert_eq!(*monitor.state().borrow(), MonitorState::Stopped);

    let last_cycle = reports.borrow().as_ref().map_or(0, |r| r.cycle);
    tokio::time::sleep(Duration::from_millis(400)).await;
    let cycle_after = monitor.reports().borrow().as_ref().map_or(0, |r| r.cycle);
    assert_eq!(cycle_after, last_cycle, "no cycles may run after stop");
}

#[tokio::test]
async fn restart_after_stop_resumes_reporting() {
    let monitor = Monitor::new(
        MonitorConfig {
            interval: Duration::from_millis(100),
            ..MonitorConfig::default()
        },
        nsa_radio(),
        Arc::new(NoLocation),
        Arc::new(NoInterfaces),
    )
    .unwrap();

    monitor.start().await;
    let mut reports = monitor.reports();
    next_report(&mut reports).await;
    monitor.stop().await;

    monitor.start().await;
    assert_eq!(*monitor.state().borrow(), MonitorState::Running);
    next_report(&mut reports).await;
    monitor.stop().await;
}

// ── Submission content ──────────────────────────────────────────────

#[tokio::test]
async fn resolved_monitor_registers_once_and_submits_signal() {
    let server = MockServer::start().await;
    mount_health(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/devices/register"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    mount_ok(&server, "/api/devices/test-device/signal").await;

    let monitor = Monitor::new(
        fast_config(&server),
        nsa_radio(),
        Arc::new(NoLocation),
        Arc::new(NoInterfaces),
    )
    .unwrap();

    assert!(matches!(
        monitor.discover().await,
        DiscoveryOutcome::Resolved(_)
    ));
    monitor.start().await;

    let mut reports = monitor.reports();
    let report = next_report(&mut reports).await;
    assert_eq!(report.submission, SubmissionStatus::Sent);

    monitor.stop().await;

    let signals: Vec<_> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path().ends_with("/signal"))
        .collect();
    assert!(!signals.is_empty());

    let body: serde_json::Value = serde_json::from_slice(&signals[0].body).unwrap();
    assert_eq!(body["signal_strength_4g"], -95);
    assert_eq!(body["signal_strength_5g"], -80);
    assert_eq!(body["is_5g"], true);
    assert_eq!(body["network_type"], "5G NSA");
    assert_eq!(body["carrier"], "TestNet");
}

#[tokio::test]
async fn a_fix_is_pushed_once_until_it_changes() {
    let server = MockServer::start().await;
    mount_health(&server).await;
    mount_ok(&server, "/api/devices/register").await;
    mount_ok(&server, "/api/devices/test-device/signal").await;
    Mock::given(method("POST"))
        .and(path("/api/devices/test-device/location"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let monitor = Monitor::new(
        fast_config(&server),
        nsa_radio(),
        fix_at(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
        Arc::new(NoInterfaces),
    )
    .unwrap();

    monitor.discover().await;
    monitor.start().await;

    // Let several cycles run; the unchanged fix must only be pushed on
    // the first one. The expect(1) above verifies on server drop.
    let mut reports = monitor.reports();
    for _ in 0..3 {
        next_report(&mut reports).await;
    }

    monitor.stop().await;

    let report = monitor.reports().borrow().clone().unwrap();
    assert_eq!(report.submission, SubmissionStatus::Sent);
    assert!(monitor.last_location().is_some());
}
