use async_trait::async_trait;
use tracing::debug;

use podconn_core::{Probe, ProbeError, ProbeResult};
use podconn_model::{Credential, SamplerConfig, Target};

use super::Kubectl;
use crate::{CommandSpec, ExecError, run_captured};

/// Counts ESTABLISHED connections on one port inside a pod via `kubectl exec`.
///
/// The remote script installs `net-tools` when `netstat` is missing; that
/// step runs on every probe.
///
/// The bearer token is passed as `--token=<tok>`. The command is marked
/// sensitive so it never reaches logs or `Debug` output, but while a child
/// runs the token is readable by local users through `/proc/<pid>/cmdline`.
/// Run the agent on a host where that is acceptable.
#[derive(Debug, Clone)]
pub struct KubectlProbe {
    kubectl: Kubectl,
    namespace: String,
    container: Option<String>,
    port: u16,
}

impl KubectlProbe {
    pub fn new(kubectl: Kubectl, namespace: impl Into<String>, port: u16) -> Self {
        Self {
            kubectl,
            namespace: namespace.into(),
            container: None,
            port,
        }
    }

    pub fn from_config(kubectl: Kubectl, cfg: &SamplerConfig) -> Self {
        let probe = Self::new(kubectl, &cfg.namespace, cfg.target_port);
        match &cfg.container {
            Some(c) => probe.with_container(c),
            None => probe,
        }
    }

    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    fn command(&self, target: &Target, credential: &Credential) -> CommandSpec {
        let mut cmd = self
            .kubectl
            .command()
            .args(["exec", "-n", self.namespace.as_str(), target.as_str()]);
        if let Some(container) = &self.container {
            cmd = cmd.args(["-c", container.as_str()]);
        }
        cmd.arg(format!("--token={}", credential.token()))
            .args(["--", "sh", "-c"])
            .arg(probe_script(self.port))
            .sensitive()
    }
}

#[async_trait]
impl Probe for KubectlProbe {
    fn name(&self) -> &'static str {
        "kubectl-exec"
    }

    async fn probe(&self, target: &Target, credential: &Credential) -> ProbeResult {
        debug!(target = %target, port = self.port, "counting tcp connections");
        let stdout = run_captured(&self.command(target, credential))
            .await
            .map_err(|e| ProbeError::failed(target, e.to_string()))?;
        parse_count(&stdout).map_err(|e| ProbeError::failed(target, e.to_string()))
    }
}

/// Shell script run inside the target.
///
/// Provisions `netstat` if absent, then prints the number of ESTABLISHED
/// connections whose local or remote endpoint uses `port`.
pub fn probe_script(port: u16) -> String {
    format!(
        "if ! which netstat > /dev/null; then \
apt-get update > /dev/null && apt-get install -y net-tools > /dev/null; \
fi; \
netstat -tn | grep ESTABLISHED | grep \":{port} \" | wc -l"
    )
}

/// Parse the probe output: one non-negative decimal integer, surrounding whitespace allowed.
pub fn parse_count(stdout: &str) -> Result<u64, ExecError> {
    let trimmed = stdout.trim();
    // `u64::from_str` tolerates a leading `+`; only bare digits are a count.
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ExecError::InvalidOutput(format!(
            "expected a connection count, got {trimmed:?}"
        )));
    }
    trimmed
        .parse::<u64>()
        .map_err(|e| ExecError::InvalidOutput(format!("expected a connection count, got {trimmed:?}: {e}")))
}
