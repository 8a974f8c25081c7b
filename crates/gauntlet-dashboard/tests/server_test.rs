//! Dashboard server integration tests.
//!
//! Drives a real server over loopback sockets:
//! - liveness and snapshot endpoints
//! - push-feed framing (initial snapshot, then live events)
//! - lifecycle transitions and graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use parking_lot::RwLock;
use tokio::time::timeout;

use gauntlet_core::{ChallengeEvent, DashboardData, EventCollector};
use gauntlet_dashboard::{DashboardConfig, DashboardError, DashboardServer, LifecycleState};

fn test_server() -> Arc<DashboardServer> {
    let config = DashboardConfig {
        port: 0,
        ..DashboardConfig::default()
    };
    let collector = Arc::new(EventCollector::new());
    let dashboard = Arc::new(RwLock::new(DashboardData::new("test-run")));
    Arc::new(DashboardServer::new(config, collector, dashboard))
}

/// Spawn the accept loop and wait until the server is serving.
async fn start_server(server: &Arc<DashboardServer>) -> String {
    let task = server.clone();
    tokio::spawn(async move {
        let _ = task.serve().await;
    });

    let addr = timeout(Duration::from_secs(2), async {
        loop {
            if server.lifecycle() == LifecycleState::Serving {
                if let Some(addr) = server.local_addr() {
                    return addr;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("server should start within timeout");

    format!("http://{addr}")
}

/// Read from the byte stream until `buffer` contains `needle`.
async fn read_until<S, B>(body: &mut S, buffer: &mut String, needle: &str)
where
    S: futures_util::Stream<Item = reqwest::Result<B>> + Unpin,
    B: AsRef<[u8]>,
{
    timeout(Duration::from_secs(2), async {
        while !buffer.contains(needle) {
            let chunk = body
                .next()
                .await
                .expect("stream should stay open")
                .expect("stream read should succeed");
            buffer.push_str(&String::from_utf8_lossy(chunk.as_ref()));
        }
    })
    .await
    .unwrap_or_else(|_| panic!("did not receive {needle:?} within timeout"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = test_server();
    let base = start_server(&server).await;

    let response = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_dashboard_endpoint_returns_aggregate() {
    let server = test_server();
    let base = start_server(&server).await;
    let sink = server.sink();

    sink.emit(ChallengeEvent::started("ch-1", "boot"));
    sink.emit(ChallengeEvent::completed(
        "ch-1",
        "boot",
        Duration::from_secs(1),
    ));
    sink.emit(ChallengeEvent::failed("ch-2", "probe", "no route"));

    let body: serde_json::Value = reqwest::get(format!("{base}/dashboard"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["run_id"], "test-run");
    assert_eq!(body["status"], "running");
    assert_eq!(body["challenges"]["ch-1"]["status"], "passed");
    assert_eq!(body["challenges"]["ch-2"]["message"], "no route");
    assert_eq!(body["summary"]["total"], 2);
    assert_eq!(body["summary"]["pass_rate"], 50.0);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_events_stream_sends_snapshot_then_challenges() {
    let server = test_server();
    let base = start_server(&server).await;
    let sink = server.sink();
    sink.emit(ChallengeEvent::started("ch-1", "boot"));

    let response = reqwest::get(format!("{base}/events")).await.unwrap();
    assert_eq!(response.status(), 200);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/event-stream"));
    assert_eq!(response.headers()["cache-control"], "no-cache");

    let mut body = response.bytes_stream();
    let mut buffer = String::new();

    // First framed message carries the full aggregate.
    read_until(&mut body, &mut buffer, "\n\n").await;
    assert!(buffer.contains("event: dashboard"));
    assert!(buffer.contains(r#""run_id":"test-run""#));
    assert!(buffer.contains(r#""ch-1""#));

    // Each later broadcast arrives as its own framed challenge message.
    sink.emit(ChallengeEvent::completed(
        "ch-1",
        "boot",
        Duration::from_secs(1),
    ));
    read_until(&mut body, &mut buffer, "event: challenge").await;
    read_until(&mut body, &mut buffer, r#""type":"completed""#).await;
    let challenge_frame = buffer.split("event: challenge").nth(1).unwrap();
    assert!(challenge_frame.starts_with("\ndata:"));
    assert!(challenge_frame.contains("\n\n"));

    assert_eq!(server.observer_count(), 1);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_stop_before_start_is_noop() {
    let server = test_server();
    assert!(server.stop().await.is_ok());
    assert_eq!(server.lifecycle(), LifecycleState::Created);
}

#[tokio::test]
async fn test_graceful_stop_ends_observer_streams() {
    let server = test_server();
    let base = start_server(&server).await;

    let response = reqwest::get(format!("{base}/events")).await.unwrap();
    let mut body = response.bytes_stream();
    let mut buffer = String::new();
    read_until(&mut body, &mut buffer, "event: dashboard").await;

    server.stop().await.expect("drain should beat the deadline");
    assert_eq!(server.lifecycle(), LifecycleState::Stopped);

    // The push stream terminates once the server shuts down.
    let drained = timeout(Duration::from_secs(2), async {
        while let Some(chunk) = body.next().await {
            if chunk.is_err() {
                break;
            }
        }
    })
    .await;
    assert!(drained.is_ok());
    assert_eq!(server.observer_count(), 0);
}

#[tokio::test]
async fn test_bind_failure_moves_to_stopped() {
    let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = occupied.local_addr().unwrap().port();

    let config = DashboardConfig {
        port,
        ..DashboardConfig::default()
    };
    let server = DashboardServer::new(
        config,
        Arc::new(EventCollector::new()),
        Arc::new(RwLock::new(DashboardData::new("test-run"))),
    );

    let err = server.serve().await.unwrap_err();
    assert!(matches!(err, DashboardError::Bind { .. }));
    assert_eq!(server.lifecycle(), LifecycleState::Stopped);
}

#[tokio::test]
async fn test_serve_twice_is_rejected() {
    let server = test_server();
    let _base = start_server(&server).await;

    let err = server.serve().await.unwrap_err();
    assert!(matches!(err, DashboardError::AlreadyStarted));

    server.stop().await.unwrap();
}
