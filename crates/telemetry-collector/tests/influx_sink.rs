#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use chrono::{TimeZone, Utc};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use telemetry_collector::config::{StorageConfig, StorageKind};
use telemetry_collector::storage::{InfluxSink, PointSink};
use telemetry_core::Point;

fn cfg(url: String) -> StorageConfig {
    StorageConfig {
        kind: StorageKind::Influx,
        url,
        token: "secret".into(),
        org: "acme".into(),
        bucket: "metrics".into(),
        timeout_ms: 20_000,
    }
}

fn point() -> Point {
    Point {
        measurement: "processed_tasks".into(),
        service: "worker".into(),
        value: 42.0,
        timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn writes_line_protocol_to_v2_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/write"))
        .and(query_param("org", "acme"))
        .and(query_param("bucket", "metrics"))
        .and(query_param("precision", "ns"))
        .and(header("authorization", "Token secret"))
        .and(body_string("processed_tasks,service=worker value=42 1704067200000000000"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let sink = InfluxSink::new(&cfg(format!("{}/", server.uri()))).unwrap();
    sink.write_point(&point()).await.expect("written");
}

#[tokio::test]
async fn rejected_write_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("bucket not found"))
        .mount(&server)
        .await;

    let sink = InfluxSink::new(&cfg(server.uri())).unwrap();
    let err = sink.write_point(&point()).await.expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UPSTREAM_WRITE");
    assert!(err.to_string().contains("bucket not found"));
}

#[tokio::test]
async fn unconfigured_url_fails_per_write() {
    let sink = InfluxSink::new(&cfg(String::new())).unwrap();
    let err = sink.write_point(&point()).await.expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UPSTREAM_WRITE");
}

#[tokio::test]
async fn hung_store_times_out_as_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let mut c = cfg(server.uri());
    c.timeout_ms = 200;
    let sink = InfluxSink::new(&c).unwrap();

    let err = tokio::time::timeout(Duration::from_secs(5), sink.write_point(&point()))
        .await
        .expect("write must not hang")
        .expect_err("must time out");
    assert_eq!(err.client_code().as_str(), "UPSTREAM_WRITE");
}
