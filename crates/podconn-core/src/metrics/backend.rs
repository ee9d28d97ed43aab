use std::sync::Arc;

use podconn_model::AggregateCount;

/// How a single probe ended, for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Probe returned a count.
    Success,
    /// Probe failed (spawn, exit code, parse, panic).
    Failure,
    /// Probe exceeded its timeout.
    Timeout,
}

impl ProbeOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            ProbeOutcome::Success => "success",
            ProbeOutcome::Failure => "failure",
            ProbeOutcome::Timeout => "timeout",
        }
    }
}

/// Backend metrics collection interface.
///
/// Implementations are injected into [`crate::FanOut`] and [`crate::Sampler`].
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record that a probe acquired its admission slot and started.
    fn record_probe_started(&self);
    /// Record probe completion with outcome and duration.
    ///
    /// # Arguments
    /// - `outcome`: How the probe terminated
    /// - `duration_ms`: Execution time in milliseconds
    fn record_probe_completed(&self, outcome: ProbeOutcome, duration_ms: u64);
    /// Record the final aggregate of a run.
    fn record_run_completed(&self, aggregate: &AggregateCount);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
