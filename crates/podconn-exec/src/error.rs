use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}: {stderr}")]
    NonZeroExit {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("invalid output: {0}")]
    InvalidOutput(String),
}
