//! # Temporal Parsing — ISO-8601 Dates, Datetimes and Times
//!
//! Parses the wire form of the three temporal special scalars into naive
//! chrono values, and renders them back to ISO-8601.
//!
//! ## UTC Marker
//!
//! A trailing `Z` is stripped before parsing: `"2014-09-12T19:34:29Z"` and
//! `"2014-09-12T19:34:29"` produce the same naive datetime. No offset
//! arithmetic is applied, the value is treated as local wall-clock time.
//!
//! ## Accepted Forms
//!
//! | Type | Forms |
//! |---|---|
//! | date | `YYYY-MM-DD` |
//! | datetime | `YYYY-MM-DDTHH:MM[:SS[.f]]`, space separator, or a bare date (midnight) |
//! | time | `HH:MM[:SS[.f]]` |
//!
//! Output always carries whole seconds, plus exactly six fractional digits
//! when the sub-second part is non-zero.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::CoercionError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Strip a single trailing UTC `Z` marker, if present.
pub fn strip_utc_marker(input: &str) -> &str {
    input.strip_suffix('Z').unwrap_or(input)
}

/// Parse an ISO-8601 calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate, CoercionError> {
    let s = strip_utc_marker(input);
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|source| CoercionError::Temporal {
        kind: "date",
        input: s.to_string(),
        source,
    })
}

/// Parse an ISO-8601 datetime as a naive value.
///
/// A bare date is accepted and resolves to midnight. When every form fails,
/// the error of the first (canonical) form is reported.
pub fn parse_datetime(input: &str) -> Result<NaiveDateTime, CoercionError> {
    let s = strip_utc_marker(input);
    NaiveDateTime::parse_from_str(s, DATETIME_FORMATS[0])
        .or_else(|e| {
            DATETIME_FORMATS[1..]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .or_else(|| {
                    NaiveDate::parse_from_str(s, DATE_FORMAT)
                        .ok()
                        .map(|d| d.and_time(NaiveTime::MIN))
                })
                .ok_or(e)
        })
        .map_err(|source| CoercionError::Temporal {
            kind: "datetime",
            input: s.to_string(),
            source,
        })
}

/// Parse an ISO-8601 time of day.
pub fn parse_time(input: &str) -> Result<NaiveTime, CoercionError> {
    let s = strip_utc_marker(input);
    NaiveTime::parse_from_str(s, TIME_FORMATS[0])
        .or_else(|e| {
            TIME_FORMATS[1..]
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
                .ok_or(e)
        })
        .map_err(|source| CoercionError::Temporal {
            kind: "time",
            input: s.to_string(),
            source,
        })
}

/// Render a date as `YYYY-MM-DD`.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Render a datetime as `YYYY-MM-DDTHH:MM:SS[.ffffff]`.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    let fmt = if dt.nanosecond() == 0 {
        "%Y-%m-%dT%H:%M:%S"
    } else {
        "%Y-%m-%dT%H:%M:%S%.6f"
    };
    dt.format(fmt).to_string()
}

/// Render a time as `HH:MM:SS[.ffffff]`.
pub fn format_time(t: &NaiveTime) -> String {
    let fmt = if t.nanosecond() == 0 { "%H:%M:%S" } else { "%H:%M:%S%.6f" };
    t.format(fmt).to_string()
}
