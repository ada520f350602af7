use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-controller playback counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlaybackMetrics {
    pub runs_started: u64,
    pub runs_completed: u64,
    pub runs_cancelled: u64,
    /// Waits that ran their full unpaused duration.
    pub suspensions_resolved: u64,
    /// Waits cut short by cancellation.
    pub suspensions_cancelled: u64,
    /// Wall-clock time spent paused across all runs.
    pub total_paused: Duration,
    /// Average requested delay per resolved suspension.
    pub avg_delay: Duration,
    /// When the most recent run reached a terminal state.
    pub last_run: Option<DateTime<Utc>>,
}

impl PlaybackMetrics {
    pub fn record_run_started(&mut self) {
        self.runs_started += 1;
    }

    pub fn record_run_completed(&mut self) {
        self.runs_completed += 1;
        self.last_run = Some(Utc::now());
    }

    pub fn record_run_cancelled(&mut self) {
        self.runs_cancelled += 1;
        self.last_run = Some(Utc::now());
    }

    pub fn record_suspension_cancelled(&mut self) {
        self.suspensions_cancelled += 1;
    }

    pub fn record_paused(&mut self, paused_for: Duration) {
        self.total_paused += paused_for;
    }

    /// Record a fully elapsed wait.
    pub fn record_suspension(&mut self, requested: Duration) {
        self.suspensions_resolved += 1;
        let count = self.suspensions_resolved;

        // Incremental mean: new_avg = prev_avg + (requested - prev_avg) / count
        self.avg_delay = if count == 1 {
            requested
        } else {
            let prev_nanos = self.avg_delay.as_nanos() as f64;
            let cur_nanos = requested.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / count as f64;
            Duration::from_nanos(avg_nanos as u64)
        };
    }
}
