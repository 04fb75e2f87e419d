#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use telemetry_collector::app_state::AppState;
use telemetry_collector::router::build_router;
use telemetry_collector::storage::{MemorySink, PointSink};
use telemetry_core::error::{Result, TelemetryError};
use telemetry_core::Point;

/// Accepts writes until `fail_at` (1-based), which fails.
struct FlakySink {
    inner: MemorySink,
    calls: AtomicUsize,
    fail_at: usize,
}

#[async_trait]
impl PointSink for FlakySink {
    async fn write_point(&self, point: &Point) -> Result<()> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.fail_at {
            return Err(TelemetryError::UpstreamWrite("bucket not found".into()));
        }
        self.inner.write_point(point).await
    }
}

async fn spawn_app(sink: Arc<dyn PointSink>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(AppState::new(sink));
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    addr
}

async fn post(addr: SocketAddr, body: &str) -> (u16, String) {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/metrics"))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    (resp.status().as_u16(), resp.text().await.unwrap())
}

#[tokio::test]
async fn valid_summary_writes_one_point_per_metric() {
    let sink = Arc::new(MemorySink::new());
    let addr = spawn_app(sink.clone()).await;

    let (status, body) = post(
        addr,
        r#"{"service_name":"worker","timestamp":"2024-01-01T00:00:00Z",
            "metrics":{"cpu_usage_percent":12.5,"processed_tasks":42}}"#,
    )
    .await;
    assert_eq!(status, 202);
    assert_eq!(body, "Metrics stored");

    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut points = sink.points();
    points.sort_by(|a, b| a.measurement.cmp(&b.measurement));
    assert_eq!(
        points,
        vec![
            Point { measurement: "cpu_usage_percent".into(), service: "worker".into(), value: 12.5, timestamp: ts },
            Point { measurement: "processed_tasks".into(), service: "worker".into(), value: 42.0, timestamp: ts },
        ]
    );
}

#[tokio::test]
async fn empty_object_is_rejected_without_writes() {
    let sink = Arc::new(MemorySink::new());
    let addr = spawn_app(sink.clone()).await;

    let (status, body) = post(addr, "{}").await;
    assert_eq!(status, 400);
    assert_eq!(body, "Missing required fields");
    assert!(sink.is_empty());
}

#[tokio::test]
async fn missing_fields_are_rejected_without_writes() {
    let sink = Arc::new(MemorySink::new());
    let addr = spawn_app(sink.clone()).await;

    for raw in [
        r#"{"service_name":"","timestamp":"2024-01-01T00:00:00Z","metrics":{"a":1}}"#,
        r#"{"service_name":"w","timestamp":"0001-01-01T00:00:00Z","metrics":{"a":1}}"#,
        r#"{"service_name":"w","timestamp":"2024-01-01T00:00:00Z","metrics":{}}"#,
    ] {
        let (status, _) = post(addr, raw).await;
        assert_eq!(status, 400, "{raw}");
    }
    assert!(sink.is_empty());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let sink = Arc::new(MemorySink::new());
    let addr = spawn_app(sink.clone()).await;

    let (status, body) = post(addr, "{not json").await;
    assert_eq!(status, 400);
    assert_eq!(body, "Invalid JSON");
    assert!(sink.is_empty());
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    let sink = Arc::new(MemorySink::new());
    let addr = spawn_app(sink.clone()).await;
    let client = reqwest::Client::new();

    for m in [reqwest::Method::GET, reqwest::Method::PUT, reqwest::Method::DELETE] {
        let resp = client
            .request(m.clone(), format!("http://{addr}/metrics"))
            .body(r#"{"service_name":"w","timestamp":"2024-01-01T00:00:00Z","metrics":{"a":1}}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 405, "{m}");
        assert_eq!(resp.text().await.unwrap(), "Only POST allowed");
    }
    assert!(sink.is_empty());
}

#[tokio::test]
async fn failed_write_returns_500_and_keeps_earlier_points() {
    let sink = Arc::new(FlakySink {
        inner: MemorySink::new(),
        calls: AtomicUsize::new(0),
        fail_at: 2,
    });
    let addr = spawn_app(sink.clone()).await;

    let (status, body) = post(
        addr,
        r#"{"service_name":"worker","timestamp":"2024-01-01T00:00:00Z",
            "metrics":{"a":1,"b":2,"c":3}}"#,
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(body, "Failed to write to InfluxDB");
    assert_eq!(sink.calls.load(Ordering::SeqCst), 2);
    assert_eq!(sink.inner.len(), 1);
}

#[tokio::test]
async fn probes_answer_ok() {
    let addr = spawn_app(Arc::new(MemorySink::new())).await;
    for route in ["health", "ready"] {
        let resp = reqwest::get(format!("http://{addr}/{route}")).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.unwrap(), "OK");
    }
}
