use std::{fmt, time::Duration};

use podconn_model::AggregateCount;

/// What happened to the publish stage of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishStatus {
    /// No publisher configured.
    Skipped,
    /// Sample accepted by the sink.
    Published,
    /// Sink or transport failure; the aggregate is still valid.
    Failed(String),
}

/// Result of one completed sampling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Number of targets discovered.
    pub targets: usize,
    pub aggregate: AggregateCount,
    /// Wall-clock time from start until aggregation finished.
    pub elapsed: Duration,
    pub publish: PublishStatus,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RunReport(targets={}, {}, elapsed={:?}, publish={:?})",
            self.targets, self.aggregate, self.elapsed, self.publish
        )
    }
}
