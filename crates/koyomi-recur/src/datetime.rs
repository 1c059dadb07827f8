//! Flexible date/time parsing for `until` values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::{ParseError, ParseResult};

/// Date-time shapes tried after RFC 3339, most specific first.
const DATETIME_FORMATS: &[&str] = &[
    "%Y%m%dT%H%M%SZ",
    "%Y%m%dT%H%M%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Bare date shapes, taken as midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Parses a date/time string in any of the accepted textual forms.
///
/// Forms carrying an offset are converted to UTC; forms without one are
/// floating times and are interpreted as UTC. No further timezone
/// normalization is performed.
///
/// ## Errors
/// Returns `ParseError::InvalidDateFormat` if no accepted form matches.
pub fn parse_flexible(s: &str) -> ParseResult<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            let naive = date.and_time(NaiveTime::MIN);
            return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }

    Err(ParseError::InvalidDateFormat(s.to_string()))
}
