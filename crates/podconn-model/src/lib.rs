mod domain;
pub use domain::{AggregateCount, Credential, Flag, Target, TimeoutMs};

mod error;
pub use error::{ModelError, ModelResult};

mod config;
pub use config::{PublishConfig, SamplerConfig};
pub use config::{
    DEFAULT_CLUSTER_NAME, DEFAULT_CONCURRENCY, DEFAULT_METRIC_NAME, DEFAULT_NAMESPACE,
    DEFAULT_POD_PATTERN, DEFAULT_PUSHGATEWAY_URL, DEFAULT_TARGET_PORT,
};
