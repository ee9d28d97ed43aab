use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use podconn_core::{Discovery, DiscoveryError};
use podconn_model::{ModelResult, SamplerConfig, Target};

use super::Kubectl;
use crate::run_captured;

const RUNNING: &str = "Running";

/// Lists running pods of a namespace and keeps the ones whose name matches a pattern.
#[derive(Debug, Clone)]
pub struct KubectlDiscovery {
    kubectl: Kubectl,
    namespace: String,
    pattern: Regex,
}

impl KubectlDiscovery {
    pub fn new(kubectl: Kubectl, namespace: impl Into<String>, pattern: Regex) -> Self {
        Self {
            kubectl,
            namespace: namespace.into(),
            pattern,
        }
    }

    pub fn from_config(kubectl: Kubectl, cfg: &SamplerConfig) -> ModelResult<Self> {
        Ok(Self::new(kubectl, &cfg.namespace, cfg.pod_regex()?))
    }

    fn args(&self) -> [&str; 6] {
        [
            "get",
            "pods",
            "-n",
            self.namespace.as_str(),
            "--field-selector=status.phase=Running",
            "--no-headers",
        ]
    }
}

#[async_trait]
impl Discovery for KubectlDiscovery {
    fn name(&self) -> &'static str {
        "kubectl"
    }

    async fn discover(&self) -> Result<Vec<Target>, DiscoveryError> {
        debug!(namespace = %self.namespace, pattern = %self.pattern, "fetching running pods");
        let cmd = self.kubectl.command().args(self.args());
        let stdout = run_captured(&cmd)
            .await
            .map_err(|e| DiscoveryError(e.to_string()))?;
        Ok(parse_pod_table(&stdout, &self.pattern))
    }
}

/// Extract eligible pod names from `kubectl get pods` output.
///
/// Columns: `NAME READY STATUS RESTARTS AGE`. A header row, if present, is skipped; rows
/// with a STATUS other than `Running` are dropped, and the name must match
/// `pattern`. Rows with only a name are accepted as running.
pub fn parse_pod_table(table: &str, pattern: &Regex) -> Vec<Target> {
    table
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            if name == "NAME" {
                return None;
            }
            if let Some(status) = fields.nth(1) {
                if status != RUNNING {
                    return None;
                }
            }
            if !pattern.is_match(name) {
                return None;
            }
            Target::new(name).ok()
        })
        .collect()
}
