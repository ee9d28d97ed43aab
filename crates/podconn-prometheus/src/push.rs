//! Pushgateway publisher.
//!
//! Pushes one sample in the text exposition format: `"<metric_name> <value>\n"`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use tracing::debug;

use podconn_core::{PublishError, Publisher};
use podconn_model::{AggregateCount, PublishConfig};

#[derive(Debug, Clone)]
pub struct PushGatewayPublisher {
    client: Client,
    endpoint: String,
    metric_name: String,
}

impl PushGatewayPublisher {
    /// Create a publisher posting to `endpoint` (a Pushgateway job URL).
    pub fn new(
        endpoint: impl Into<String>,
        metric_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PublishError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PublishError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            metric_name: metric_name.into(),
        })
    }

    pub fn from_config(cfg: &PublishConfig) -> Result<Self, PublishError> {
        Self::new(&cfg.endpoint, &cfg.metric_name, cfg.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Render one sample line.
pub fn render_sample(metric_name: &str, value: u64) -> String {
    format!("{metric_name} {value}\n")
}

#[async_trait]
impl Publisher for PushGatewayPublisher {
    fn name(&self) -> &'static str {
        "pushgateway"
    }

    async fn publish(&self, aggregate: &AggregateCount) -> Result<(), PublishError> {
        let body = render_sample(&self.metric_name, aggregate.total);
        debug!(endpoint = %self.endpoint, metric = %self.metric_name, value = aggregate.total, "pushing sample");

        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(PublishError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
