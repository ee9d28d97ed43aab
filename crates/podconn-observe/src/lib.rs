//! Logging setup shared by podconn binaries.
mod logger;
pub use logger::*;
