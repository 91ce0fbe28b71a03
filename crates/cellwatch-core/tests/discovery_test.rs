// Integration tests for the discovery orchestrator using wiremock.
//
// Multiple live hosts on one port are simulated with distinct loopback
// addresses (127.0.0.x), which Linux serves without configuration.

use std::net::TcpListener;
use std::time::{Duration, Instant};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cellwatch_core::capabilities::NoInterfaces;
use cellwatch_core::{Discovery, DiscoveryOutcome, DiscoveryState, MonitorConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn scan_config(port: u16, priority_hosts: &[&str]) -> MonitorConfig {
    MonitorConfig {
        port,
        priority_hosts: priority_hosts.iter().map(|h| (*h).to_string()).collect(),
        probe_timeout: Duration::from_millis(300),
        retry_probe_timeout: Duration::from_millis(300),
        ..MonitorConfig::default()
    }
}

fn discovery(config: MonitorConfig) -> Discovery {
    Discovery::new(config.into(), reqwest::Client::new())
}

async fn server_on(host: &str, port: u16) -> MockServer {
    let listener = TcpListener::bind((host, port)).unwrap();
    MockServer::builder().listener(listener).start().await
}

async fn mount_health(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

// ── Resolution ──────────────────────────────────────────────────────

#[tokio::test]
async fn resolves_the_single_reachable_candidate_regardless_of_position() {
    let server = server_on("127.0.0.2", 0).await;
    mount_health(&server, 200).await;
    let port = server.address().port();

    // Reachable candidate buried between dead ones.
    let disc = discovery(scan_config(port, &["127.0.0.55", "127.0.0.2", "127.0.0.56"]));
    let outcome = disc.run(&NoInterfaces, None).await;

    match outcome {
        DiscoveryOutcome::Resolved(ep) => assert_eq!(ep.host, "127.0.0.2"),
        DiscoveryOutcome::Exhausted => panic!("expected resolution"),
    }
}

#[tokio::test]
async fn a_404_server_is_a_valid_resolution() {
    // No mocks mounted: every route answers 404, which still proves a
    // live server.
    let server = server_on("127.0.0.2", 0).await;
    let port = server.address().port();

    let disc = discovery(scan_config(port, &["127.0.0.2"]));
    let outcome = disc.run(&NoInterfaces, None).await;

    assert!(matches!(outcome, DiscoveryOutcome::Resolved(ref ep) if ep.host == "127.0.0.2"));
}

#[tokio::test]
async fn first_completion_wins_and_exactly_one_resolution_occurs() {
    let listener_a = TcpListener::bind(("127.0.0.2", 0)).unwrap();
    let port = listener_a.local_addr().unwrap().port();
    let listener_b = TcpListener::bind(("127.0.0.3", port)).unwrap();

    let server_a = MockServer::builder().listener(listener_a).start().await;
    let server_b = MockServer::builder().listener(listener_b).start().await;
    mount_health(&server_a, 404).await;
    mount_health(&server_b, 200).await;

    let disc = discovery(scan_config(port, &["10.255.255.1", "127.0.0.2", "127.0.0.3"]));
    let mut state = disc.state();
    let outcome = disc.run(&NoInterfaces, None).await;

    // Either reachable host is an acceptable winner...
    let DiscoveryOutcome::Resolved(winner) = outcome else {
        panic!("expected resolution");
    };
    assert!(winner.host == "127.0.0.2" || winner.host == "127.0.0.3");

    // ...and the final state names exactly that winner.
    assert_eq!(
        *state.borrow_and_update(),
        DiscoveryState::Resolved(winner)
    );
}

#[tokio::test]
async fn winner_cancels_sibling_probes() {
    let listener_fast = TcpListener::bind(("127.0.0.2", 0)).unwrap();
    let port = listener_fast.local_addr().unwrap().port();
    let listener_slow = TcpListener::bind(("127.0.0.3", port)).unwrap();

    let fast = MockServer::builder().listener(listener_fast).start().await;
    let slow = MockServer::builder().listener(listener_slow).start().await;
    mount_health(&fast, 200).await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&slow)
        .await;

    let mut config = scan_config(port, &["127.0.0.2", "127.0.0.3"]);
    config.probe_timeout = Duration::from_secs(10);
    let disc = discovery(config);

    let started = Instant::now();
    let outcome = disc.run(&NoInterfaces, None).await;

    assert!(matches!(outcome, DiscoveryOutcome::Resolved(ref ep) if ep.host == "127.0.0.2"));
    // The slow sibling was dropped, not awaited to its 30s response.
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn queued_probes_never_start_after_resolution() {
    let listener_winner = TcpListener::bind(("127.0.0.2", 0)).unwrap();
    let port = listener_winner.local_addr().unwrap().port();
    let listener_bystander = TcpListener::bind(("127.0.0.3", port)).unwrap();

    let winner = MockServer::builder().listener(listener_winner).start().await;
    let bystander = MockServer::builder()
        .listener(listener_bystander)
        .start()
        .await;
    mount_health(&winner, 200).await;
    mount_health(&bystander, 200).await;

    // Concurrency 1: the bystander's probe is queued behind the winner
    // and must be cancelled before it ever sends a request.
    let mut config = scan_config(port, &["127.0.0.2", "127.0.0.3"]);
    config.probe_concurrency = 1;
    let disc = discovery(config);

    let outcome = disc.run(&NoInterfaces, None).await;
    assert!(matches!(outcome, DiscoveryOutcome::Resolved(ref ep) if ep.host == "127.0.0.2"));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(bystander.received_requests().await.unwrap().is_empty());
}

// ── Exhaustion ──────────────────────────────────────────────────────

#[tokio::test]
async fn exhausts_within_the_timeout_budget_when_nothing_answers() {
    // Dead priority host, no interfaces, and common-range candidates
    // that nothing in the test environment serves.
    let disc = discovery(scan_config(1, &["127.0.0.55"]));
    let mut state = disc.state();

    let started = Instant::now();
    let outcome = disc.run(&NoInterfaces, None).await;

    assert_eq!(outcome, DiscoveryOutcome::Exhausted);
    assert_eq!(*state.borrow_and_update(), DiscoveryState::Exhausted);
    // 36 candidates at 300ms each with 12-way parallelism, plus the
    // retry: comfortably under ten seconds.
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn exhaustion_is_not_terminal() {
    let disc = discovery(scan_config(1, &["127.0.0.55"]));
    assert_eq!(disc.run(&NoInterfaces, None).await, DiscoveryOutcome::Exhausted);

    // A server appears on a loopback address covered by the priority
    // list; the next explicit run finds it.
    let server = server_on("127.0.0.55", 0).await;
    mount_health(&server, 200).await;

    let disc = discovery(scan_config(server.address().port(), &["127.0.0.55"]));
    assert!(matches!(
        disc.run(&NoInterfaces, None).await,
        DiscoveryOutcome::Resolved(_)
    ));
}

#[tokio::test]
async fn cached_hint_is_tried_first() {
    let server = server_on("127.0.0.2", 0).await;
    mount_health(&server, 200).await;
    let port = server.address().port();

    // The hint is not in the priority host list at all.
    let disc = discovery(scan_config(port, &["127.0.0.55"]));
    let cached = cellwatch_api::Endpoint::http("127.0.0.2", port);

    let started = Instant::now();
    let outcome = disc.run(&NoInterfaces, Some(cached.clone())).await;

    assert_eq!(outcome, DiscoveryOutcome::Resolved(cached));
    // Hit on the first batch, long before any range scan.
    assert!(started.elapsed() < Duration::from_secs(2));
}
