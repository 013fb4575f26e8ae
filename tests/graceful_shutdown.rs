//! Lifecycle tests over a live socket.
//!
//! Each test binds an ephemeral port, runs the real server task, and drives
//! shutdown through the coordinator the signal handler would normally fire.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use item_service::config::AppConfig;
use item_service::http::HttpServer;
use item_service::lifecycle::{LifecycleState, Shutdown};

struct TestServer {
    base_url: String,
    lifecycle: Arc<LifecycleState>,
    shutdown: Shutdown,
    handle: JoinHandle<Result<(), std::io::Error>>,
}

async fn start_server(grace_period_secs: u64) -> TestServer {
    let mut config = AppConfig::default();
    config.shutdown.grace_period_secs = grace_period_secs;
    // The recorder is process-global; these tests only exercise lifecycle.
    config.metrics.enabled = false;

    let lifecycle = Arc::new(LifecycleState::new());
    let shutdown = Shutdown::new();

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    let server = HttpServer::new(Arc::new(config), lifecycle.clone(), None);
    let handle = {
        let shutdown = shutdown.clone();
        tokio::spawn(server.run_until(listener, shutdown))
    };

    TestServer {
        base_url: format!("http://{addr}"),
        lifecycle,
        shutdown,
        handle,
    }
}

async fn probe_status(base_url: &str, path: &str) -> reqwest::StatusCode {
    reqwest::get(format!("{base_url}{path}"))
        .await
        .expect("probe request")
        .status()
}

#[tokio::test]
async fn probes_answer_during_the_warmup_window() {
    let server = start_server(5).await;

    // Serving before ready: liveness up, readiness down.
    assert_eq!(probe_status(&server.base_url, "/health/live").await, 200);
    assert_eq!(probe_status(&server.base_url, "/health/ready").await, 503);
    assert_eq!(probe_status(&server.base_url, "/health/startup").await, 503);

    server.lifecycle.mark_ready();
    assert_eq!(probe_status(&server.base_url, "/health/ready").await, 200);
    assert_eq!(probe_status(&server.base_url, "/health/startup").await, 200);

    server.shutdown.trigger();
    server
        .handle
        .await
        .expect("server task")
        .expect("clean shutdown");
}

#[tokio::test]
async fn signal_before_serving_starts_still_shuts_down() {
    let mut config = AppConfig::default();
    config.metrics.enabled = false;
    let lifecycle = Arc::new(LifecycleState::new());

    // The signal lands before the server task ever polls the coordinator.
    let shutdown = Shutdown::new();
    shutdown.trigger();

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let server = HttpServer::new(Arc::new(config), lifecycle, None);

    tokio::time::timeout(Duration::from_secs(2), server.run_until(listener, shutdown))
        .await
        .expect("server never observed the earlier signal")
        .expect("clean shutdown");
}

#[tokio::test]
async fn shutdown_disables_readiness_while_in_flight_requests_finish() {
    let server = start_server(10).await;
    server.lifecycle.mark_ready();

    let slow = {
        let url = format!("{}/api/v1/slow?delay=1", server.base_url);
        tokio::spawn(async move { reqwest::get(url).await })
    };
    // Let the slow request reach its handler before draining starts.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let drained_at = Instant::now();
    server.shutdown.trigger();

    // Readiness flips immediately, well before the in-flight request ends.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!server.lifecycle.is_ready());

    let response = slow
        .await
        .expect("client task")
        .expect("in-flight request completed");
    assert_eq!(response.status(), 200);

    server
        .handle
        .await
        .expect("server task")
        .expect("clean shutdown");
    let elapsed = drained_at.elapsed();
    assert!(
        elapsed < Duration::from_secs(5),
        "drain took {elapsed:?}, expected completion well before the grace period"
    );
}

#[tokio::test]
async fn grace_period_bounds_the_drain() {
    let server = start_server(1).await;
    server.lifecycle.mark_ready();

    let stuck = {
        let url = format!("{}/api/v1/slow?delay=20", server.base_url);
        tokio::spawn(async move { reqwest::get(url).await })
    };
    tokio::time::sleep(Duration::from_millis(200)).await;

    let drained_at = Instant::now();
    server.shutdown.trigger();

    // The server stops waiting on the stuck request once the grace period
    // ends; in production the process exits here, cutting the request off.
    server.handle.await.expect("server task").expect("bounded shutdown");
    let elapsed = drained_at.elapsed();
    assert!(
        elapsed >= Duration::from_millis(900),
        "drain ended after {elapsed:?}, before the grace period"
    );
    assert!(
        elapsed < Duration::from_secs(5),
        "drain took {elapsed:?}, grace period did not bound it"
    );

    // Returning early means the 20s request is still in flight, not served.
    assert!(!stuck.is_finished(), "drain waited for the stuck request");
    stuck.abort();
}
