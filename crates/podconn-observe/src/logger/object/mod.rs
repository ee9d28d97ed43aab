mod format;
mod level;
mod timestamp;
mod timezone;

pub use format::LoggerFormat;
pub use level::LoggerLevel;
pub use timestamp::LoggerRfc3339;
pub use timezone::LoggerTimeZone;
