use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// The issuer failed to produce a token.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("{0}")]
    Issuer(String),

    #[error("issuer did not answer within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Raw answer of a credential issuer.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    /// Expiry reported by the issuer, in unix seconds, if any.
    ///
    /// Informational only: the cache applies its own TTL.
    pub expiry_unix: Option<i64>,
}

impl IssuedToken {
    pub fn new(token: impl Into<String>, expiry_unix: Option<i64>) -> Self {
        Self {
            token: token.into(),
            expiry_unix,
        }
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"<redacted>")
            .field("expiry_unix", &self.expiry_unix)
            .finish()
    }
}

/// External collaborator that issues cluster tokens.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn issue(&self) -> Result<IssuedToken, CredentialError>;
}
