//! Optional final stage that pushes the aggregate to a metrics sink.
use async_trait::async_trait;
use thiserror::Error;

use podconn_model::AggregateCount;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("sink rejected sample with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),
}

/// Metrics sink for the final aggregate.
#[async_trait]
pub trait Publisher: Send + Sync {
    fn name(&self) -> &'static str;

    /// Send one sample carrying `aggregate.total`.
    async fn publish(&self, aggregate: &AggregateCount) -> Result<(), PublishError>;
}
