//! Timestamp parsing, display formatting and normalization.
//!
//! Feed timestamps are ISO-8601 strings written by the ingestion job. They
//! are displayed in the en-GB convention (`dd/mm/yyyy, HH:MM:SS`) and
//! compared as normalized UTC strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Shown in place of a missing or unparseable timestamp.
pub const DATE_UNAVAILABLE: &str = "Date unavailable";

const DISPLAY_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 with an offset, a naive date-time (taken as UTC) and a
/// bare `YYYY-MM-DD` (UTC midnight).
pub fn parse_iso(value: &str) -> Option<DateTime<Utc>> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(v, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(v, "%Y-%m-%dT%H:%M") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format a timestamp for display in `tz`.
///
/// Returns [`DATE_UNAVAILABLE`] when `iso` is absent or unparseable.
pub fn format_date<Tz>(iso: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match iso.and_then(parse_iso) {
        Some(dt) => dt.with_timezone(tz).format(DISPLAY_FORMAT).to_string(),
        None => DATE_UNAVAILABLE.to_string(),
    }
}

/// Normalize a timestamp to fixed-width UTC (`2024-01-01T00:00:00.000Z`).
///
/// Normalized strings order lexicographically in time order.
pub fn normalize_timestamp(iso: &str) -> Option<String> {
    parse_iso(iso).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}
