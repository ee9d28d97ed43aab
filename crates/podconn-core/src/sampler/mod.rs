//! One sampling run: discover → credential → fan-out → aggregate → publish.
mod builder;
pub use builder::SamplerBuilder;

mod report;
pub use report::{PublishStatus, RunReport};

use std::{sync::Arc, time::Duration};

use tokio::time::Instant;
use tracing::{info, instrument, warn};

use podconn_model::{AggregateCount, Target};

use crate::{
    credential::CredentialCache,
    discovery::{Discovery, DiscoveryError},
    error::CoreError,
    fanout::FanOut,
    metrics::MetricsHandle,
    probe::Probe,
    publish::Publisher,
};

/// Pipeline owning every collaborator of a run.
pub struct Sampler {
    discovery: Arc<dyn Discovery>,
    credentials: Arc<CredentialCache>,
    fanout: FanOut,
    publisher: Option<Arc<dyn Publisher>>,
    discovery_timeout: Option<Duration>,
    metrics: MetricsHandle,
}

impl Sampler {
    pub fn builder(
        discovery: Arc<dyn Discovery>,
        credentials: Arc<CredentialCache>,
        probe: Arc<dyn Probe>,
    ) -> SamplerBuilder {
        SamplerBuilder::new(discovery, credentials, probe)
    }

    /// Perform one run.
    ///
    /// Discovery and credential failures abort before any probe is dispatched.
    /// With no eligible targets the credential is not fetched and the total is zero.
    /// Probe and publish failures are logged and never turn into an error.
    #[instrument(level = "debug", skip(self), fields(discovery = self.discovery.name()))]
    pub async fn run_once(&self) -> Result<RunReport, CoreError> {
        let started = Instant::now();
        info!("starting tcp connection count");

        let targets = self.discover().await?;
        info!(
            count = targets.len(),
            targets = ?targets.iter().map(Target::as_str).collect::<Vec<_>>(),
            "running targets found",
        );

        let aggregate = if targets.is_empty() {
            info!("no eligible targets, nothing to probe");
            AggregateCount::default()
        } else {
            let credential = self.credentials.acquire().await?;
            self.fanout.run(&targets, &credential).await
        };
        let elapsed = started.elapsed();

        self.metrics.record_run_completed(&aggregate);
        info!(
            total = aggregate.total,
            succeeded = aggregate.succeeded,
            failed = aggregate.failed,
            elapsed = ?elapsed,
            "total tcp connections counted",
        );

        let publish = self.publish(&aggregate).await;
        Ok(RunReport {
            targets: targets.len(),
            aggregate,
            elapsed,
            publish,
        })
    }

    async fn discover(&self) -> Result<Vec<Target>, DiscoveryError> {
        let Some(limit) = self.discovery_timeout else {
            return self.discovery.discover().await;
        };
        tokio::time::timeout(limit, self.discovery.discover())
            .await
            .map_err(|_| DiscoveryError(format!("timed out after {}ms", limit.as_millis())))?
    }

    async fn publish(&self, aggregate: &AggregateCount) -> PublishStatus {
        let Some(publisher) = &self.publisher else {
            return PublishStatus::Skipped;
        };
        match publisher.publish(aggregate).await {
            Ok(()) => {
                info!(publisher = publisher.name(), total = aggregate.total, "aggregate published");
                PublishStatus::Published
            }
            Err(e) => {
                warn!(publisher = publisher.name(), error = %e, "failed to publish aggregate");
                PublishStatus::Failed(e.to_string())
            }
        }
    }
}
