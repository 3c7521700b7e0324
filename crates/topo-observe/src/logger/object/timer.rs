use std::fmt;

use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

/// RFC 3339 timestamps at a fixed offset.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rfc3339Timer {
    offset: UtcOffset,
}

impl Rfc3339Timer {
    pub(crate) fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }
}

impl FormatTime for Rfc3339Timer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = OffsetDateTime::now_utc().to_offset(self.offset);
        match now.format(&Rfc3339) {
            Ok(ts) => write!(w, "{ts}"),
            Err(_) => write!(w, "<invalid-time>"),
        }
    }
}
