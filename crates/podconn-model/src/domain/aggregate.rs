use std::fmt;

use serde::{Deserialize, Serialize};

/// Combined connection count of one run.
///
/// `total` only includes successful probes; `failed` counts probes that
/// were excluded from the sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCount {
    /// Sum of all successful per-target counts.
    pub total: u64,
    /// Number of probes that returned a count.
    pub succeeded: usize,
    /// Number of probes that failed.
    pub failed: usize,
}

impl AggregateCount {
    /// Number of probes that reached a result, successful or not.
    pub fn probed(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Fold one successful count into the aggregate.
    pub fn add_success(&mut self, count: u64) {
        self.total = self.total.saturating_add(count);
        self.succeeded += 1;
    }

    /// Record one failed probe.
    pub fn add_failure(&mut self) {
        self.failed += 1;
    }
}

impl fmt::Display for AggregateCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} succeeded={} failed={}",
            self.total, self.succeeded, self.failed
        )
    }
}
