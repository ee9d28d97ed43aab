//! Prometheus integration for podconn.
//!
//! - [`PrometheusMetrics`]: in-process [`podconn_core::MetricsBackend`] backed by a prometheus registry.
//! - [`PushGatewayPublisher`]: [`podconn_core::Publisher`] pushing the aggregate to a Pushgateway.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use podconn_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let handle: podconn_core::MetricsHandle = Arc::new(metrics.clone());
//! // ... hand `handle` to the sampler, then:
//! let _text = metrics.encode_text()?;
//! # Ok(())
//! # }
//! ```

mod backend;
pub use backend::PrometheusMetrics;

mod push;
pub use push::{PushGatewayPublisher, render_sample};

pub use prometheus::{Encoder, Registry, TextEncoder};
