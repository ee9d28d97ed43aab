//! Bounded-concurrency fan-out of probes.
//!
//! One task per target; a semaphore admits at most `limit` tasks at once.
//! The permit is acquired before spawning and owned by the task, so it is
//! released on every exit path. The caller gets the aggregate only after all
//! tasks joined.
use std::{fmt, sync::Arc, time::Duration};

use tokio::{sync::Semaphore, task::JoinSet, time::Instant};
use tracing::{debug, info, instrument, warn};

use podconn_model::{AggregateCount, Credential, Target};

use crate::{
    aggregate::Aggregator,
    metrics::{MetricsHandle, ProbeOutcome, noop_metrics},
    probe::{Probe, ProbeError, ProbeResult},
};

pub struct FanOut {
    probe: Arc<dyn Probe>,
    limit: usize,
    probe_timeout: Option<Duration>,
    metrics: MetricsHandle,
}

impl FanOut {
    /// Create a scheduler admitting at most `limit` probes (clamped to at least 1).
    pub fn new(probe: Arc<dyn Probe>, limit: usize) -> Self {
        Self {
            probe,
            limit: limit.max(1),
            probe_timeout: None,
            metrics: noop_metrics(),
        }
    }

    /// Bound each probe by `timeout`; an expired probe counts as a failure.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = Some(timeout);
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Concurrency ceiling.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Probe every target once and return the combined count.
    ///
    /// Never fails: per-target errors are logged and excluded from the sum.
    #[instrument(level = "debug", skip_all, fields(targets = targets.len(), limit = self.limit))]
    pub async fn run(&self, targets: &[Target], credential: &Credential) -> AggregateCount {
        let aggregator = Arc::new(Aggregator::new());
        let permits = Arc::new(Semaphore::new(self.limit));
        let mut tasks = JoinSet::new();

        for target in targets {
            // The semaphore is local and never closed.
            let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                let err = ProbeError::Aborted {
                    target: target.clone(),
                    reason: "admission closed".into(),
                };
                warn!(target = %target, error = %err, "probe not dispatched");
                aggregator.record(&Err(err));
                continue;
            };

            let probe = Arc::clone(&self.probe);
            let aggregator = Arc::clone(&aggregator);
            let metrics = Arc::clone(&self.metrics);
            let credential = credential.clone();
            let target = target.clone();
            let timeout = self.probe_timeout;

            tasks.spawn(async move {
                let _permit = permit;
                metrics.record_probe_started();
                let started = Instant::now();

                let result = probe_with_timeout(probe.as_ref(), &target, &credential, timeout).await;

                let duration_ms = started.elapsed().as_millis() as u64;
                metrics.record_probe_completed(outcome_of(&result), duration_ms);
                match &result {
                    Ok(count) => info!(target = %target, count, duration_ms, "connection count"),
                    Err(e) => warn!(target = %target, error = %e, duration_ms, "probe failed"),
                }
                aggregator.record(&result);
            });
        }

        debug!("all probes dispatched, waiting for completion");
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                // The task never reached its own completion record.
                warn!(error = %e, "probe task did not complete");
                self.metrics.record_probe_completed(ProbeOutcome::Failure, 0);
                aggregator.record_failure();
            }
        }
        aggregator.snapshot()
    }
}

async fn probe_with_timeout(
    probe: &dyn Probe,
    target: &Target,
    credential: &Credential,
    timeout: Option<Duration>,
) -> ProbeResult {
    let Some(limit) = timeout else {
        return probe.probe(target, credential).await;
    };
    match tokio::time::timeout(limit, probe.probe(target, credential)).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout {
            target: target.clone(),
            timeout_ms: limit.as_millis() as u64,
        }),
    }
}

fn outcome_of(result: &ProbeResult) -> ProbeOutcome {
    match result {
        Ok(_) => ProbeOutcome::Success,
        Err(e) if e.is_timeout() => ProbeOutcome::Timeout,
        Err(_) => ProbeOutcome::Failure,
    }
}

impl fmt::Debug for FanOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanOut")
            .field("probe", &self.probe.name())
            .field("limit", &self.limit)
            .field("probe_timeout", &self.probe_timeout)
            .finish()
    }
}
