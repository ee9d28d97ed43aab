use serde::{Deserialize, Serialize};

use podconn_model::SamplerConfig;
use podconn_observe::LoggerConfig;

/// Everything the agent needs for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub logger: LoggerConfig,
    pub sampler: SamplerConfig,
}
