use std::fmt;

use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

/// RFC 3339 timer for `tracing_subscriber::fmt` with a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggerRfc3339 {
    offset: UtcOffset,
}

impl LoggerRfc3339 {
    pub fn utc() -> Self {
        Self::with_offset(UtcOffset::UTC)
    }

    pub fn with_offset(offset: UtcOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    fn render(&self, at: OffsetDateTime) -> Result<String, fmt::Error> {
        at.to_offset(self.offset)
            .format(&Rfc3339)
            .map_err(|_| fmt::Error)
    }
}

impl Default for LoggerRfc3339 {
    fn default() -> Self {
        Self::utc()
    }
}

impl FormatTime for LoggerRfc3339 {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let stamp = self.render(OffsetDateTime::now_utc())?;
        w.write_str(&stamp)
    }
}
