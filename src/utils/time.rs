//! Time utilities

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a datetime string in ISO 8601 format
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Parse a contest deadline.
///
/// Accepts RFC 3339 with an offset, or the `YYYY-MM-DDTHH:MM[:SS]` form
/// sent by datetime-local inputs, which is taken as UTC.
pub fn parse_deadline(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    parse_datetime(s).or_else(|| {
        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| naive.and_utc())
    })
}
