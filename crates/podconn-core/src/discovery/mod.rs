//! Target discovery seam.
use async_trait::async_trait;
use thiserror::Error;

use podconn_model::Target;

/// Discovery could not produce a target list.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DiscoveryError(pub String);

/// Enumerates the workers eligible for probing.
#[async_trait]
pub trait Discovery: Send + Sync {
    /// Name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Return the eligible, currently running targets in a stable order.
    ///
    /// An empty list is a valid answer and not an error.
    async fn discover(&self) -> Result<Vec<Target>, DiscoveryError>;
}
