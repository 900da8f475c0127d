//! Timestamp parsing shared by the validator and the duration formatter

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%#z", "%Y-%m-%d %H:%M%#z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO 8601 timestamp into local wall-clock time.
///
/// Timestamps with an offset (`2024-03-15T12:00:00Z`, `2024-03-15T12:00Z`)
/// are converted to the local zone; timestamps without one are already local
/// time. A bare date (`2024-03-15`) is midnight UTC, converted to local time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    let with_offset = DateTime::parse_from_rfc3339(value).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(value, format).ok())
    });
    if let Some(dt) = with_offset {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(midnight.and_utc().with_timezone(&Local).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}
