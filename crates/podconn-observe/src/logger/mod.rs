mod config;
mod error;
mod install;
mod object;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use object::{LoggerFormat, LoggerLevel, LoggerRfc3339, LoggerTimeZone};

use tracing::warn;

/// Installs the global tracing subscriber described by `cfg`.
///
/// With [`LoggerTimeZone::Local`] the offset is detected here, so call this
/// before the async runtime spawns its worker threads. If detection fails the
/// logger falls back to UTC and says so once initialized.
///
/// # Examples
/// ```rust
/// use podconn_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("Failed to initialize logger");
///
/// tracing::info!("Logger initialized successfully");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    let (timer, fallback) = match cfg.tz.offset() {
        Ok(offset) => (LoggerRfc3339::with_offset(offset), None),
        Err(e) => (LoggerRfc3339::utc(), Some(e)),
    };

    match cfg.format {
        LoggerFormat::Text => install::text(cfg, timer)?,
        LoggerFormat::Json => install::json(cfg, timer)?,
        LoggerFormat::Journald => install::journald(cfg)?,
    }

    if let Some(e) = fallback {
        warn!(error = %e, "log timestamps fall back to UTC");
    }
    Ok(())
}
