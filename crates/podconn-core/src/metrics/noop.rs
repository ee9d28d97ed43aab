use podconn_model::AggregateCount;

use crate::metrics::backend::{MetricsBackend, ProbeOutcome};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_probe_started(&self) {}

    #[inline(always)]
    fn record_probe_completed(&self, _: ProbeOutcome, _: u64) {}

    #[inline(always)]
    fn record_run_completed(&self, _: &AggregateCount) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_metrics_is_zero_size() {
        assert_eq!(std::mem::size_of::<NoOpMetrics>(), 0);
    }
}
