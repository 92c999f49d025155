//! Counters for a pipeline run

use serde::Serialize;
use std::time::Duration;

/// What happened during a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunMetrics {
    /// Records handed to a lookup task
    pub dispatched: usize,

    /// Records whose name resolved to a code
    pub resolved: usize,

    /// Records whose name matched nothing
    pub unresolved: usize,

    /// Rows written to the output
    pub rows_written: usize,

    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: u64,
}

impl RunMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a task being started
    pub fn record_dispatch(&mut self) {
        self.dispatched += 1;
    }

    /// Record a written row
    pub fn record_row(&mut self, resolved: bool) {
        self.rows_written += 1;
        if resolved {
            self.resolved += 1;
        } else {
            self.unresolved += 1;
        }
    }

    /// Set the run duration
    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let lines = [
            "Run Summary".to_string(),
            "===========".to_string(),
            format!("Records dispatched: {}", self.dispatched),
            format!("Rows written: {}", self.rows_written),
            format!("  Resolved: {}", self.resolved),
            format!("  Unresolved: {}", self.unresolved),
            format!("Elapsed: {:.1}s", self.elapsed_ms as f64 / 1000.0),
        ];
        lines.join("\n")
    }
}
