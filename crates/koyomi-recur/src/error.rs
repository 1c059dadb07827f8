//! Recurrence parameter parse errors.

use thiserror::Error;

/// An error raised while parsing recurrence parameter text.
///
/// Malformed entry shapes and unmanaged field names are not errors; they are
/// dropped during parsing. Only values that belong to a recognized field can
/// fail the parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The `until` value is not a recognizable date/time string.
    #[error("invalid date/time for until: {0:?}")]
    InvalidDateFormat(String),

    /// A numeric field contained a token that is not an integer.
    #[error("invalid integer token for {field}: {token:?}")]
    InvalidIntegerToken {
        /// Canonical name of the field being parsed.
        field: &'static str,
        /// The offending token.
        token: String,
    },

    /// A `byday`/`byweekday` token did not match a known weekday code.
    #[error("unknown weekday symbol: {0:?}")]
    UnknownWeekdaySymbol(String),
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
