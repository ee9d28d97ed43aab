use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::invalid;
use crate::{
    domain::{Flag, TimeoutMs},
    error::ModelResult,
};

/// Pushgateway job endpoint the aggregate is pushed to.
pub const DEFAULT_PUSHGATEWAY_URL: &str = "http://k8s-monitori-pushgate-fcae943c1e-e1a58b32cb8c6cce.elb.ap-southeast-1.amazonaws.com/metrics/job/client_tcp_new";

/// Name of the pushed sample.
pub const DEFAULT_METRIC_NAME: &str = "client_tcp_new";

const DEFAULT_PUBLISH_TIMEOUT_MS: TimeoutMs = 10_000;

/// Settings of the optional publish stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Publishing is off unless explicitly enabled.
    pub enabled: Flag,
    pub endpoint: String,
    pub metric_name: String,
    pub timeout_ms: TimeoutMs,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: Flag::disabled(),
            endpoint: DEFAULT_PUSHGATEWAY_URL.to_string(),
            metric_name: DEFAULT_METRIC_NAME.to_string(),
            timeout_ms: DEFAULT_PUBLISH_TIMEOUT_MS,
        }
    }
}

impl PublishConfig {
    /// Metric names follow the Prometheus grammar `[a-zA-Z_:][a-zA-Z0-9_:]*`.
    pub fn validate(&self) -> ModelResult<()> {
        if !is_metric_name(&self.metric_name) {
            return Err(invalid(
                "publish.metric_name",
                format!("'{}' is not a valid metric name", self.metric_name),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(invalid("publish.timeout_ms", "cannot be zero"));
        }
        if self.enabled.is_enabled()
            && !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://"))
        {
            return Err(invalid(
                "publish.endpoint",
                "must be an http(s) URL when publishing is enabled",
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn is_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}
