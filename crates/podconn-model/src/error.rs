use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid config field '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("invalid target name: {0:?}")]
    InvalidTarget(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
