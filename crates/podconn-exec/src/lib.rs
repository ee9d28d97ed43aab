//! Subprocess-backed collaborators.
//!
//! Every external call goes through [`run_captured`]: children are killed when
//! the calling future is dropped, so a timeout applied by the core layer also
//! reaps the process.
mod error;
pub use error::ExecError;

mod command;
pub use command::{CommandSpec, run_captured};

#[cfg(feature = "aws")]
pub mod aws;

#[cfg(feature = "kubectl")]
pub mod kubectl;
