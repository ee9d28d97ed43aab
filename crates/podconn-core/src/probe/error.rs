use thiserror::Error;

use podconn_model::Target;

/// Failure of a single probe.
///
/// Always scoped to one target; never aborts the batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("probe of '{target}' failed: {reason}")]
    Failed { target: Target, reason: String },

    #[error("probe of '{target}' timed out after {timeout_ms}ms")]
    Timeout { target: Target, timeout_ms: u64 },

    #[error("probe of '{target}' aborted: {reason}")]
    Aborted { target: Target, reason: String },
}

impl ProbeError {
    /// Convenience constructor for the common failure case.
    pub fn failed(target: &Target, reason: impl Into<String>) -> Self {
        Self::Failed {
            target: target.clone(),
            reason: reason.into(),
        }
    }

    /// Target the failure belongs to.
    pub fn target(&self) -> &Target {
        match self {
            Self::Failed { target, .. }
            | Self::Timeout { target, .. }
            | Self::Aborted { target, .. } => target,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
