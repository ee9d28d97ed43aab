use std::{sync::Arc, time::Duration};

use podconn_model::{DEFAULT_CONCURRENCY, SamplerConfig};

use crate::{
    credential::CredentialCache,
    discovery::Discovery,
    fanout::FanOut,
    metrics::{MetricsHandle, noop_metrics},
    probe::Probe,
    publish::Publisher,
};

use super::Sampler;

/// Builder for [`Sampler`].
pub struct SamplerBuilder {
    discovery: Arc<dyn Discovery>,
    credentials: Arc<CredentialCache>,
    probe: Arc<dyn Probe>,
    publisher: Option<Arc<dyn Publisher>>,
    concurrency: usize,
    probe_timeout: Option<Duration>,
    discovery_timeout: Option<Duration>,
    metrics: MetricsHandle,
}

impl SamplerBuilder {
    pub(super) fn new(
        discovery: Arc<dyn Discovery>,
        credentials: Arc<CredentialCache>,
        probe: Arc<dyn Probe>,
    ) -> Self {
        Self {
            discovery,
            credentials,
            probe,
            publisher: None,
            concurrency: DEFAULT_CONCURRENCY,
            probe_timeout: None,
            discovery_timeout: None,
            metrics: noop_metrics(),
        }
    }

    /// Apply concurrency and timeouts from a validated config.
    pub fn with_config(self, cfg: &SamplerConfig) -> Self {
        self.concurrency(cfg.concurrency)
            .probe_timeout(cfg.probe_timeout())
            .discovery_timeout(cfg.discovery_timeout())
    }

    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit;
        self
    }

    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = Some(timeout);
        self
    }

    pub fn discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = Some(timeout);
        self
    }

    /// Enable the publish stage.
    pub fn publisher(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn build(self) -> Sampler {
        let mut fanout =
            FanOut::new(self.probe, self.concurrency).with_metrics(Arc::clone(&self.metrics));
        if let Some(timeout) = self.probe_timeout {
            fanout = fanout.with_probe_timeout(timeout);
        }
        Sampler {
            discovery: self.discovery,
            credentials: self.credentials,
            fanout,
            publisher: self.publisher,
            discovery_timeout: self.discovery_timeout,
            metrics: self.metrics,
        }
    }
}
