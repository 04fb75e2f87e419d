//! InfluxDB v2 writer.
//!
//! Points go out one request at a time through the HTTP write API using line
//! protocol: `measurement,service=<tag> value=<f64> <unix ns>`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use telemetry_core::error::{Result, TelemetryError};
use telemetry_core::Point;

use crate::config::StorageConfig;

use super::PointSink;

pub struct InfluxSink {
    client: reqwest::Client,
    write_url: String,
    token: String,
    org: String,
    bucket: String,
}

impl InfluxSink {
    pub fn new(cfg: &StorageConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| TelemetryError::Startup(format!("http client: {e}")))?;

        Ok(Self {
            client,
            write_url: format!("{}/api/v2/write", cfg.url.trim_end_matches('/')),
            token: cfg.token.clone(),
            org: cfg.org.clone(),
            bucket: cfg.bucket.clone(),
        })
    }
}

#[async_trait]
impl PointSink for InfluxSink {
    async fn write_point(&self, point: &Point) -> Result<()> {
        let body = line_protocol(point)?;

        let mut req = self
            .client
            .post(&self.write_url)
            .query(&[("org", self.org.as_str()), ("bucket", self.bucket.as_str()), ("precision", "ns")])
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body);
        if !self.token.is_empty() {
            req = req.header(AUTHORIZATION, format!("Token {}", self.token));
        }

        let resp = req
            .send()
            .await
            .map_err(|e| TelemetryError::UpstreamWrite(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(TelemetryError::UpstreamWrite(format!("{status}: {detail}")));
        }
        Ok(())
    }
}

/// Encode one point as a line-protocol record.
pub fn line_protocol(point: &Point) -> Result<String> {
    let ns = point
        .timestamp
        .timestamp_nanos_opt()
        .ok_or_else(|| TelemetryError::UpstreamWrite("timestamp outside nanosecond range".into()))?;

    Ok(format!(
        "{},service={} value={} {}",
        escape(&point.measurement, &[',', ' ']),
        escape(&point.service, &[',', '=', ' ']),
        point.value,
        ns
    ))
}

/// Backslash-escape `special` and backslash itself; control whitespace becomes
/// `\n`, `\r`, `\t` so one point always encodes to exactly one line.
fn escape(raw: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == '\\' || special.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::{TimeZone, Utc};

    fn point(measurement: &str, service: &str, value: f64) -> Point {
        Point {
            measurement: measurement.into(),
            service: service.into(),
            value,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn encodes_measurement_tag_field_and_nanos() {
        let line = line_protocol(&point("cpu_usage_percent", "worker", 12.5)).unwrap();
        assert_eq!(line, "cpu_usage_percent,service=worker value=12.5 1704067200000000000");

        let line = line_protocol(&point("processed_tasks", "worker", 42.0)).unwrap();
        assert_eq!(line, "processed_tasks,service=worker value=42 1704067200000000000");
    }

    #[test]
    fn escapes_special_characters() {
        let line = line_protocol(&point("a b,c", "x=y z", 1.0)).unwrap();
        assert!(line.starts_with("a\\ b\\,c,service=x\\=y\\ z value=1 "));
    }

    #[test]
    fn control_whitespace_cannot_split_a_record() {
        let p = point("cpu\nforged,service=admin value=999", "wor\r\tker", 1.0);
        let line = line_protocol(&p).unwrap();
        assert_eq!(line.lines().count(), 1);
        assert!(!line.contains('\r') && !line.contains('\t'));
        assert!(line.starts_with("cpu\\nforged\\,service=admin\\ value=999,service=wor\\r\\tker value=1 "));
    }

    #[test]
    fn rejects_timestamps_outside_nanosecond_range() {
        let mut p = point("m", "s", 1.0);
        p.timestamp = Utc.with_ymd_and_hms(1500, 1, 1, 0, 0, 0).unwrap();
        assert!(line_protocol(&p).is_err());
    }
}
