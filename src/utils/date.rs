//! UTC datetime helpers.
//!
//! Post timestamps are stored as `DateTime<Utc>`. This module converts
//! TOML front matter datetimes into that form and formats timestamps
//! for feeds (RFC 3339) and HTTP headers (IMF-fixdate).
//!
//! # Examples
//!
//! ```ignore
//! let dt = from_toml(&"2024-06-15T14:30:45+02:00".parse()?).unwrap();
//! assert_eq!(to_rfc3339(dt), "2024-06-15T12:30:45Z");
//! assert_eq!(to_http_date(dt), "Sat, 15 Jun 2024 12:30:45 GMT");
//! ```

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc,
};
use toml::value::{Datetime, Offset};

/// strftime layout of an HTTP date (`Sun, 06 Nov 1994 08:49:37 GMT`).
pub const HTTP_DATE_LAYOUT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Seconds from `0001-01-01T00:00:00Z` to the Unix epoch.
const ZERO_TIME_SECS: i64 = -62_135_596_800;

/// `0001-01-01T00:00:00Z`, the timestamp of posts without a date.
pub fn zero() -> DateTime<Utc> {
    DateTime::from_timestamp(ZERO_TIME_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Convert a TOML datetime to UTC.
///
/// - Offset datetimes are shifted to UTC.
/// - Local datetimes are read as UTC.
/// - Local dates are read as midnight UTC.
/// - A bare local time has no date and yields `None`.
pub fn from_toml(value: &Datetime) -> Option<DateTime<Utc>> {
    let date = value.date?;
    let date = NaiveDate::from_ymd_opt(
        i32::from(date.year),
        u32::from(date.month),
        u32::from(date.day),
    )?;

    let time = match value.time {
        Some(t) => NaiveTime::from_hms_nano_opt(
            u32::from(t.hour),
            u32::from(t.minute),
            u32::from(t.second),
            t.nanosecond,
        )?,
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
    };

    let offset_secs = match value.offset {
        Some(Offset::Custom { minutes }) => i32::from(minutes) * 60,
        Some(Offset::Z) | None => 0,
    };

    let offset = FixedOffset::east_opt(offset_secs)?;
    let local = offset
        .from_local_datetime(&NaiveDateTime::new(date, time))
        .single()?;
    Some(local.with_timezone(&Utc))
}

/// Format as RFC 3339 for Atom feeds and templates.
///
/// Returns: `YYYY-MM-DDTHH:MM:SSZ` (fractional seconds only when present)
pub fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Format as an HTTP date for `Last-Modified`.
pub fn to_http_date(dt: DateTime<Utc>) -> String {
    dt.format(HTTP_DATE_LAYOUT).to_string()
}

/// Parse an HTTP date (`If-Modified-Since`).
pub fn parse_http_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
