use thiserror::Error;

use podconn_model::ModelError;

use crate::{credential::CredentialError, discovery::DiscoveryError};

/// Errors that abort a whole run.
///
/// Per-target probe failures and publish failures never surface here.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("discovery failed: {0}")]
    DiscoveryFailed(#[from] DiscoveryError),

    #[error("credential fetch failed: {0}")]
    CredentialFetchFailed(#[from] CredentialError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ModelError),
}
