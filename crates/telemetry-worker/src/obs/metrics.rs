//! Minimal metrics registry for the worker.
//!
//! Unlabelled counter and histogram types backed by atomics, rendered in the
//! Prometheus text exposition format. Histogram bounds are in seconds.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::sync::AtomicF64;

#[derive(Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Increment by 1.
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", name, help);
        let _ = writeln!(out, "# TYPE {} counter", name);
        let _ = writeln!(out, "{} {}", name, self.get());
    }
}

/// `count` upper bounds starting at `start`, spaced `width` apart.
pub fn linear_buckets(start: f64, width: f64, count: usize) -> Vec<f64> {
    (0..count)
        // Round away float noise so 0.1 + 0.2 renders as 0.3.
        .map(|i| ((start + width * i as f64) * 1e9).round() / 1e9)
        .collect()
}

pub struct Histogram {
    bounds: Vec<f64>,
    buckets: Vec<AtomicU64>,
    count: AtomicU64,
    sum: AtomicF64,
}

impl Histogram {
    pub fn new(bounds: Vec<f64>) -> Self {
        let buckets = bounds.iter().map(|_| AtomicU64::new(0)).collect();
        Self {
            bounds,
            buckets,
            count: AtomicU64::new(0),
            sum: AtomicF64::default(),
        }
    }

    /// Observe a duration and increment cumulative buckets (seconds).
    pub fn observe(&self, duration: Duration) {
        let secs = duration.as_secs_f64();
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(secs);

        // Cumulative buckets: increment every bucket whose bound covers the value.
        for (i, &le) in self.bounds.iter().enumerate() {
            if secs <= le {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", name, help);
        let _ = writeln!(out, "# TYPE {} histogram", name);
        for (i, le) in self.bounds.iter().enumerate() {
            let n = self.buckets[i].load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{le=\"{}\"}} {}", name, le, n);
        }
        let count = self.count();
        let _ = writeln!(out, "{}_bucket{{le=\"+Inf\"}} {}", name, count);
        let _ = writeln!(out, "{}_sum {}", name, self.sum.load());
        let _ = writeln!(out, "{}_count {}", name, count);
    }
}

pub struct WorkerMetrics {
    pub processed_tasks: Counter,
    pub processing_duration: Histogram,
}

impl Default for WorkerMetrics {
    fn default() -> Self {
        Self {
            processed_tasks: Counter::default(),
            processing_duration: Histogram::new(linear_buckets(0.1, 0.2, 10)),
        }
    }
}

impl WorkerMetrics {
    pub fn record_task(&self, elapsed: Duration) {
        self.processed_tasks.inc();
        self.processing_duration.observe(elapsed);
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.processed_tasks.render(
            "worker_processed_tasks_total",
            "Total number of processed tasks",
            &mut out,
        );
        self.processing_duration.render(
            "worker_task_processing_duration_seconds",
            "Duration of task processing in seconds",
            &mut out,
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_buckets_match_expected_bounds() {
        let b = linear_buckets(0.1, 0.2, 10);
        assert_eq!(b.len(), 10);
        assert_eq!(b[0], 0.1);
        assert_eq!(b[1], 0.3);
        assert_eq!(b[9], 1.9);
    }

    #[test]
    fn render_contains_counter_and_cumulative_buckets() {
        let m = WorkerMetrics::default();
        m.record_task(Duration::from_millis(50));
        m.record_task(Duration::from_millis(250));
        m.record_task(Duration::from_secs(5));

        let text = m.render();
        assert!(text.contains("# TYPE worker_processed_tasks_total counter"));
        assert!(text.contains("worker_processed_tasks_total 3\n"));
        assert!(text.contains("worker_task_processing_duration_seconds_bucket{le=\"0.1\"} 1\n"));
        assert!(text.contains("worker_task_processing_duration_seconds_bucket{le=\"0.3\"} 2\n"));
        assert!(text.contains("worker_task_processing_duration_seconds_bucket{le=\"1.9\"} 2\n"));
        assert!(text.contains("worker_task_processing_duration_seconds_bucket{le=\"+Inf\"} 3\n"));
        assert!(text.contains("worker_task_processing_duration_seconds_count 3\n"));
    }
}
