//! Recurrence parameter text parsing.
//!
//! Grammar of the stored text:
//!
//! ```text
//! params-text := entry (";" entry)*
//! entry       := field ":" valuelist
//! valuelist   := token ("," token)*
//! ```
//!
//! `;`, `:` and `,` are reserved and may not appear inside field names or
//! tokens; there is no escaping. Entries that do not fit the shape and fields
//! outside the allowed set are dropped without error.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::datetime;
use crate::error::{ParseError, ParseResult};
use crate::weekday::Weekday;

/// A recognized recurrence parameter field.
///
/// This is the full allowed field set; `ParamField::parse` is the allow-list
/// filter applied to raw entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamField {
    Until,
    Count,
    Interval,
    ByMinute,
    ByHour,
    ByMonthDay,
    ByYearDay,
    ByWeekNo,
    ByMonth,
    BySetPos,
    Wkst,
    ByWeekday,
}

impl ParamField {
    /// Returns the canonical lower-case field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Until => "until",
            Self::Count => "count",
            Self::Interval => "interval",
            Self::ByMinute => "byminute",
            Self::ByHour => "byhour",
            Self::ByMonthDay => "bymonthday",
            Self::ByYearDay => "byyearday",
            Self::ByWeekNo => "byweekno",
            Self::ByMonth => "bymonth",
            Self::BySetPos => "bysetpos",
            Self::Wkst => "wkst",
            Self::ByWeekday => "byweekday",
        }
    }

    /// Parses a field name (case-insensitive).
    ///
    /// `byday` is accepted as an input alias for `byweekday`. Returns `None`
    /// for any name outside the allowed field set.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_lowercase().as_str() {
            "until" => Self::Until,
            "count" => Self::Count,
            "interval" => Self::Interval,
            "byminute" => Self::ByMinute,
            "byhour" => Self::ByHour,
            "bymonthday" => Self::ByMonthDay,
            "byyearday" => Self::ByYearDay,
            "byweekno" => Self::ByWeekNo,
            "bymonth" => Self::ByMonth,
            "bysetpos" => Self::BySetPos,
            "wkst" => Self::Wkst,
            "byday" | "byweekday" => Self::ByWeekday,
            _ => return None,
        })
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed parameter value.
///
/// The shape is dictated by the field: `until` carries a point in time,
/// `byweekday` an ordered weekday list, everything else an ordered integer
/// list (a single token still becomes a one-element list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Until(DateTime<Utc>),
    Weekdays(Vec<Weekday>),
    Numbers(Vec<i64>),
}

/// Parsed recurrence parameters.
///
/// Keys are always members of the allowed field set. The mapping is derived
/// from the raw text on every `parse` call and is never cached or mutated in
/// place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecurParams {
    entries: BTreeMap<ParamField, ParamValue>,
}

impl RecurParams {
    /// ## Summary
    /// Parses recurrence parameter text into a typed mapping.
    ///
    /// Absent input yields the empty mapping. Entries that do not split on
    /// `:` into exactly a field and a value, and entries whose (lower-cased)
    /// field name is not in the allowed set, are dropped without error. When
    /// the same field appears more than once the last occurrence wins.
    ///
    /// ## Errors
    /// Fails on the first value that cannot be decoded for its field: an
    /// unrecognizable `until` date/time, a non-integer token in a numeric
    /// field, or an unknown weekday code in `byday`/`byweekday`. A failed
    /// parse produces no mapping at all.
    pub fn parse(raw: Option<&str>) -> ParseResult<Self> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };

        let mut entries = BTreeMap::new();
        for entry in raw.split(';') {
            let parts: Vec<&str> = entry.split(':').collect();
            let &[field, value] = parts.as_slice() else {
                tracing::trace!(entry, "Dropping malformed entry");
                continue;
            };
            let Some(field) = ParamField::parse(field) else {
                tracing::trace!(entry, "Dropping unmanaged field");
                continue;
            };
            entries.insert(field, parse_value(field, value)?);
        }

        Ok(Self { entries })
    }

    /// Returns true if no parameters were present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of parsed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the value stored for a field, if any.
    #[must_use]
    pub fn get(&self, field: ParamField) -> Option<&ParamValue> {
        self.entries.get(&field)
    }

    /// Returns the `until` point in time, if present.
    #[must_use]
    pub fn until(&self) -> Option<DateTime<Utc>> {
        match self.entries.get(&ParamField::Until) {
            Some(ParamValue::Until(dt)) => Some(*dt),
            _ => None,
        }
    }

    /// Returns the `byweekday` list, if present.
    #[must_use]
    pub fn weekdays(&self) -> Option<&[Weekday]> {
        match self.entries.get(&ParamField::ByWeekday) {
            Some(ParamValue::Weekdays(days)) => Some(days),
            _ => None,
        }
    }

    /// Returns the integer list stored for a numeric field, if present.
    #[must_use]
    pub fn numbers(&self, field: ParamField) -> Option<&[i64]> {
        match self.entries.get(&field) {
            Some(ParamValue::Numbers(numbers)) => Some(numbers),
            _ => None,
        }
    }

    /// Iterates over the parsed fields and values.
    pub fn iter(&self) -> impl Iterator<Item = (ParamField, &ParamValue)> {
        self.entries.iter().map(|(field, value)| (*field, value))
    }
}

fn parse_value(field: ParamField, value: &str) -> ParseResult<ParamValue> {
    match field {
        ParamField::Until => Ok(ParamValue::Until(datetime::parse_flexible(value)?)),
        ParamField::ByWeekday => {
            let days = value
                .split(',')
                .map(|token| {
                    Weekday::from_code(token)
                        .ok_or_else(|| ParseError::UnknownWeekdaySymbol(token.to_string()))
                })
                .collect::<ParseResult<Vec<_>>>()?;
            Ok(ParamValue::Weekdays(days))
        }
        _ => {
            let numbers = value
                .split(',')
                .map(|token| {
                    token
                        .parse::<i64>()
                        .map_err(|_| ParseError::InvalidIntegerToken {
                            field: field.as_str(),
                            token: token.to_string(),
                        })
                })
                .collect::<ParseResult<Vec<_>>>()?;
            Ok(ParamValue::Numbers(numbers))
        }
    }
}
