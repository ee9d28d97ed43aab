pub mod aggregate;
pub mod credential;
pub mod discovery;
pub mod error;
pub mod fanout;
pub mod metrics;
pub mod probe;
pub mod publish;
pub mod sampler;

#[cfg(test)]
mod testing;

pub use aggregate::Aggregator;
pub use credential::{
    CredentialCache, CredentialError, CredentialIssuer, IssuedToken, MIN_CREDENTIAL_TTL,
};
pub use discovery::{Discovery, DiscoveryError};
pub use error::CoreError;
pub use fanout::FanOut;
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, ProbeOutcome, noop_metrics};
pub use probe::{Probe, ProbeError, ProbeResult};
pub use publish::{PublishError, Publisher};
pub use sampler::{PublishStatus, RunReport, Sampler, SamplerBuilder};

pub mod prelude {
    pub use crate::error::CoreError;
    pub use crate::credential::{CredentialCache, CredentialIssuer};
    pub use crate::discovery::Discovery;
    pub use crate::probe::Probe;
    pub use crate::publish::Publisher;
    pub use crate::sampler::{RunReport, Sampler};
}
