mod target;
pub use target::Target;

mod credential;
pub use credential::Credential;

mod aggregate;
pub use aggregate::AggregateCount;

mod flag;
pub use flag::Flag;

/// Timeout value in milliseconds.
///
/// Used by config fields that bound external calls (issuer, discovery, probe, publish).
pub type TimeoutMs = u64;
