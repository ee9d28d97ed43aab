//! Running sum of probe results.
use std::sync::{Mutex, MutexGuard, PoisonError};

use podconn_model::AggregateCount;

use crate::probe::ProbeResult;

/// Thread-safe accumulator shared by all probe workers of one run.
///
/// Every update takes the lock; the sum is order independent.
#[derive(Debug, Default)]
pub struct Aggregator {
    tally: Mutex<AggregateCount>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one probe result: successes add to the total, failures are only counted.
    pub fn record(&self, result: &ProbeResult) {
        let mut tally = self.lock();
        match result {
            Ok(count) => tally.add_success(*count),
            Err(_) => tally.add_failure(),
        }
    }

    /// Count a failure that never produced a [`ProbeResult`] (e.g. a panicked worker).
    pub fn record_failure(&self) {
        self.lock().add_failure();
    }

    /// Current value of the tally.
    pub fn snapshot(&self) -> AggregateCount {
        *self.lock()
    }

    /// Combine a finished set of results in one pass.
    pub fn combine<'a, I>(results: I) -> AggregateCount
    where
        I: IntoIterator<Item = &'a ProbeResult>,
    {
        let agg = Self::new();
        for r in results {
            agg.record(r);
        }
        agg.snapshot()
    }

    // A poisoned tally is still a consistent count: updates are single statements.
    fn lock(&self) -> MutexGuard<'_, AggregateCount> {
        self.tally.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
