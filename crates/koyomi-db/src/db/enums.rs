//! Database enum types with Diesel serialization.
//!
//! Type-safe wrappers for database CHECK constraints, implementing `ToSql`
//! and `FromSql` for automatic conversion between Rust and `PostgreSQL`.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::fmt;
use std::io::Write;

/// Recurrence base frequency.
///
/// Maps to the `rule.frequency` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
pub enum Frequency {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
    Minutely,
    Secondly,
}

impl ToSql<Text, Pg> for Frequency {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for Frequency {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"YEARLY" => Ok(Self::Yearly),
            b"MONTHLY" => Ok(Self::Monthly),
            b"WEEKLY" => Ok(Self::Weekly),
            b"DAILY" => Ok(Self::Daily),
            b"HOURLY" => Ok(Self::Hourly),
            b"MINUTELY" => Ok(Self::Minutely),
            b"SECONDLY" => Ok(Self::Secondly),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl Frequency {
    /// Returns the database string representation of this frequency.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yearly => "YEARLY",
            Self::Monthly => "MONTHLY",
            Self::Weekly => "WEEKLY",
            Self::Daily => "DAILY",
            Self::Hourly => "HOURLY",
            Self::Minutely => "MINUTELY",
            Self::Secondly => "SECONDLY",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Frequency> for koyomi_recur::Frequency {
    fn from(frequency: Frequency) -> Self {
        match frequency {
            Frequency::Yearly => Self::Yearly,
            Frequency::Monthly => Self::Monthly,
            Frequency::Weekly => Self::Weekly,
            Frequency::Daily => Self::Daily,
            Frequency::Hourly => Self::Hourly,
            Frequency::Minutely => Self::Minutely,
            Frequency::Secondly => Self::Secondly,
        }
    }
}

impl From<koyomi_recur::Frequency> for Frequency {
    fn from(frequency: koyomi_recur::Frequency) -> Self {
        match frequency {
            koyomi_recur::Frequency::Yearly => Self::Yearly,
            koyomi_recur::Frequency::Monthly => Self::Monthly,
            koyomi_recur::Frequency::Weekly => Self::Weekly,
            koyomi_recur::Frequency::Daily => Self::Daily,
            koyomi_recur::Frequency::Hourly => Self::Hourly,
            koyomi_recur::Frequency::Minutely => Self::Minutely,
            koyomi_recur::Frequency::Secondly => Self::Secondly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_as_str_matches_check_constraint() {
        assert_eq!(Frequency::Yearly.as_str(), "YEARLY");
        assert_eq!(Frequency::Secondly.as_str(), "SECONDLY");
    }

    #[test]
    fn frequency_converts_to_recur_vocabulary() {
        let freq: koyomi_recur::Frequency = Frequency::Weekly.into();
        assert_eq!(freq, koyomi_recur::Frequency::Weekly);

        let back: Frequency = freq.into();
        assert_eq!(back, Frequency::Weekly);
    }
}
