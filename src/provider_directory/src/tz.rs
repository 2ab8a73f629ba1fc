//! Timestamp encoding helpers.
//!
//! All database writes are RFC-3339 UTC strings with millisecond precision so
//! that stored values sort lexically in time order. Decoding accepts any
//! RFC-3339 offset and converts to UTC.
//!
//! Examples
//! - "2024-03-10T09:30:00-05:00" -> 2024-03-10T14:30:00Z
//! - 2024-03-10T14:30:00.123Z -> "2024-03-10T14:30:00.123Z"

use anyhow::Context;
use chrono::{DateTime, Utc};

/// RFC-3339 with offset -> UTC.
pub fn parse_ts_to_utc(s: &str) -> anyhow::Result<DateTime<Utc>> {
    let dt = DateTime::parse_from_rfc3339(s).with_context(|| format!("bad rfc3339: {s}"))?;
    Ok(dt.with_timezone(&Utc))
}

/// Format a UTC datetime as an RFC-3339 string with millisecond precision.
pub fn to_rfc3339_millis(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Current time, formatted for storage.
pub fn now_rfc3339_millis() -> String {
    to_rfc3339_millis(Utc::now())
}
