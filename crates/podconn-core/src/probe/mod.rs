//! Probe abstraction: one remote measurement against one target.
//!
//! Concrete probes (e.g. `kubectl exec`) implement [`Probe`] and are driven by [`crate::FanOut`].
mod error;
pub use error::ProbeError;

use async_trait::async_trait;

use podconn_model::{Credential, Target};

/// Outcome of one probe, consumed exactly once by the aggregator.
pub type ProbeResult = Result<u64, ProbeError>;

/// Remote connection counter.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Probe name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Count live connections inside `target`, authenticating with `credential`.
    ///
    /// Every failure must be reported as [`ProbeError`] carrying the target.
    async fn probe(&self, target: &Target, credential: &Credential) -> ProbeResult;
}
