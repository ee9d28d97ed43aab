//! Metrics collection abstraction for probe runs.
//!
//! Backends (prometheus, ...) implement [`MetricsBackend`]; the default is [`NoOpMetrics`].
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, ProbeOutcome};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
