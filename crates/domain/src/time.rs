//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for log entries.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Wall-clock rendering used by log listings (`HH:MM:SS`).
#[must_use]
pub fn clock_time(ts: &Timestamp) -> String {
    ts.format("%H:%M:%S").to_string()
}
