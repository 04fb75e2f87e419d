//! Counters shared between the task workers and the reporter.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crate::sync::AtomicF64;

/// Completed-task count and cumulative duration.
///
/// Both are updated per completed task but not as a pair: a reader may observe
/// a count increment whose duration has not landed yet. Both values only grow,
/// so the next snapshot catches up.
#[derive(Debug, Default)]
pub struct AggregationState {
    completed: AtomicU64,
    duration_sum_secs: AtomicF64,
}

impl AggregationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed task.
    pub fn record(&self, elapsed: Duration) {
        self.completed.fetch_add(1, Ordering::AcqRel);
        self.duration_sum_secs.fetch_add(elapsed.as_secs_f64());
    }

    /// Independent reads of both counters.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            completed: self.completed.load(Ordering::Acquire),
            duration_sum_secs: self.duration_sum_secs.load(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub completed: u64,
    pub duration_sum_secs: f64,
}

impl Snapshot {
    /// Mean task duration; 0 when nothing has completed.
    pub fn average_seconds(&self) -> f64 {
        if self.completed == 0 {
            return 0.0;
        }
        self.duration_sum_secs / self.completed as f64
    }
}

/// On/off switch read by every worker before each iteration.
///
/// Changes are fire-and-forget: a task already running completes, and workers
/// observe the new value on their next check.
#[derive(Debug)]
pub struct ActivityFlag {
    active: AtomicBool,
}

impl Default for ActivityFlag {
    fn default() -> Self {
        Self { active: AtomicBool::new(true) }
    }
}

impl ActivityFlag {
    pub fn new(active: bool) -> Self {
        Self { active: AtomicBool::new(active) }
    }

    pub fn start(&self) {
        self.active.store(true, Ordering::Release);
    }

    pub fn stop(&self) {
        self.active.store(false, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_is_zero_without_tasks() {
        let s = AggregationState::new().snapshot();
        assert_eq!(s.completed, 0);
        assert_eq!(s.average_seconds(), 0.0);
    }

    #[test]
    fn average_is_sum_over_count() {
        let state = AggregationState::new();
        for ms in [250, 500, 750, 1500] {
            state.record(Duration::from_millis(ms));
        }
        let s = state.snapshot();
        assert_eq!(s.completed, 4);
        assert!((s.duration_sum_secs - 3.0).abs() < 1e-9);
        assert!((s.average_seconds() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn activity_flag_is_idempotent() {
        let flag = ActivityFlag::default();
        assert!(flag.is_active());
        flag.stop();
        flag.stop();
        assert!(!flag.is_active());
        flag.start();
        flag.start();
        assert!(flag.is_active());
    }
}
