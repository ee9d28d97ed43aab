//! Run configuration.
//!
//! Defaults mirror the production deployment; every field can be overridden
//! through serde (missing fields fall back to defaults).
mod publish;
pub use publish::{DEFAULT_METRIC_NAME, DEFAULT_PUSHGATEWAY_URL, PublishConfig};

use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    domain::TimeoutMs,
    error::{ModelError, ModelResult},
};

/// Namespace the worker pods live in.
pub const DEFAULT_NAMESPACE: &str = "fpms";

/// Eligibility pattern applied to pod names.
pub const DEFAULT_POD_PATTERN: &str = r"\bclient\b";

/// Port whose established connections are counted.
pub const DEFAULT_TARGET_PORT: u16 = 9280;

/// Cluster the credential is issued for.
pub const DEFAULT_CLUSTER_NAME: &str = "fpms-prod";

/// Maximum number of probes in flight.
pub const DEFAULT_CONCURRENCY: usize = 100;

const DEFAULT_CREDENTIAL_TTL_MS: u64 = 5 * 60 * 1_000;
const DEFAULT_CREDENTIAL_TIMEOUT_MS: TimeoutMs = 30_000;
const DEFAULT_DISCOVERY_TIMEOUT_MS: TimeoutMs = 30_000;
const DEFAULT_PROBE_TIMEOUT_MS: TimeoutMs = 60_000;

/// Configuration of one sampling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Kubernetes namespace searched for targets.
    pub namespace: String,
    /// Regular expression a pod name must match to be probed.
    pub pod_pattern: String,
    /// Container to exec into; `None` uses the pod's default container.
    pub container: Option<String>,
    /// Local port whose ESTABLISHED connections are counted.
    pub target_port: u16,
    /// Cluster name passed to the credential issuer.
    pub cluster_name: String,
    /// Hard ceiling of simultaneously running probes.
    pub concurrency: usize,
    /// Validity window the credential cache enforces.
    pub credential_ttl_ms: u64,
    pub credential_timeout_ms: TimeoutMs,
    pub discovery_timeout_ms: TimeoutMs,
    pub probe_timeout_ms: TimeoutMs,
    /// Optional publish stage.
    pub publish: PublishConfig,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            pod_pattern: DEFAULT_POD_PATTERN.to_string(),
            container: None,
            target_port: DEFAULT_TARGET_PORT,
            cluster_name: DEFAULT_CLUSTER_NAME.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            credential_ttl_ms: DEFAULT_CREDENTIAL_TTL_MS,
            credential_timeout_ms: DEFAULT_CREDENTIAL_TIMEOUT_MS,
            discovery_timeout_ms: DEFAULT_DISCOVERY_TIMEOUT_MS,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            publish: PublishConfig::default(),
        }
    }
}

impl SamplerConfig {
    /// Validate the configuration before wiring a run.
    ///
    /// Rules:
    /// - `namespace` and `cluster_name` are not blank;
    /// - `pod_pattern` compiles;
    /// - `target_port`, `concurrency`, TTL and every timeout are non-zero;
    /// - `container`, when set, is not blank;
    /// - the publish section is valid.
    pub fn validate(&self) -> ModelResult<()> {
        if self.namespace.trim().is_empty() {
            return Err(invalid("namespace", "cannot be empty"));
        }
        if self.cluster_name.trim().is_empty() {
            return Err(invalid("cluster_name", "cannot be empty"));
        }
        self.pod_regex()?;

        if let Some(container) = &self.container {
            if container.trim().is_empty() {
                return Err(invalid("container", "cannot be blank when set"));
            }
        }
        if self.target_port == 0 {
            return Err(invalid("target_port", "cannot be zero"));
        }
        if self.concurrency == 0 {
            return Err(invalid("concurrency", "must be at least 1"));
        }
        for (field, value) in [
            ("credential_ttl_ms", self.credential_ttl_ms),
            ("credential_timeout_ms", self.credential_timeout_ms),
            ("discovery_timeout_ms", self.discovery_timeout_ms),
            ("probe_timeout_ms", self.probe_timeout_ms),
        ] {
            if value == 0 {
                return Err(invalid(field, "cannot be zero"));
            }
        }
        self.publish.validate()
    }

    /// Compile the pod eligibility pattern.
    pub fn pod_regex(&self) -> ModelResult<Regex> {
        Regex::new(&self.pod_pattern).map_err(|e| invalid("pod_pattern", e.to_string()))
    }

    pub fn credential_ttl(&self) -> Duration {
        Duration::from_millis(self.credential_ttl_ms)
    }

    pub fn credential_timeout(&self) -> Duration {
        Duration::from_millis(self.credential_timeout_ms)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> ModelError {
    ModelError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = SamplerConfig::default();
        cfg.validate().expect("default config must validate");

        assert_eq!(cfg.namespace, "fpms");
        assert_eq!(cfg.target_port, 9280);
        assert_eq!(cfg.concurrency, 100);
        assert_eq!(cfg.credential_ttl(), Duration::from_secs(300));
        assert!(cfg.publish.enabled.is_disabled());
    }

    #[test]
    fn default_pattern_matches_whole_word() {
        let re = SamplerConfig::default().pod_regex().unwrap();

        assert!(re.is_match("client-apiserver-7d9f"));
        assert!(re.is_match("api-client-0"));
        assert!(!re.is_match("clients-0"));
        assert!(!re.is_match("webclient-0"));
    }

    #[test]
    fn rejects_zero_concurrency() {
        let cfg = SamplerConfig {
            concurrency: 0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidConfig {
                field: "concurrency",
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_pattern_and_blank_fields() {
        let bad = [
            SamplerConfig {
                pod_pattern: "(unclosed".into(),
                ..Default::default()
            },
            SamplerConfig {
                namespace: " ".into(),
                ..Default::default()
            },
            SamplerConfig {
                container: Some("".into()),
                ..Default::default()
            },
            SamplerConfig {
                target_port: 0,
                ..Default::default()
            },
            SamplerConfig {
                probe_timeout_ms: 0,
                ..Default::default()
            },
        ];

        for cfg in bad {
            assert!(cfg.validate().is_err(), "expected error for {cfg:?}");
        }
    }

    #[test]
    fn partial_deserialization_keeps_defaults() {
        let json = r#"{"namespace": "staging", "concurrency": 8, "publish": {"enabled": true}}"#;
        let cfg: SamplerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(cfg.namespace, "staging");
        assert_eq!(cfg.concurrency, 8);
        assert_eq!(cfg.cluster_name, DEFAULT_CLUSTER_NAME);
        assert!(cfg.publish.enabled.is_enabled());
        assert_eq!(cfg.publish.metric_name, DEFAULT_METRIC_NAME);
        cfg.validate().unwrap();
    }
}
