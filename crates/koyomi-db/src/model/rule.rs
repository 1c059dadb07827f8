//! Model for recurrence rules.

use std::fmt;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use koyomi_recur::{ParseResult, RecurParams};

use crate::db::enums::Frequency;
use crate::db::schema::rule;

/// A named recurrence rule for calendar events.
///
/// `params` holds the serialized extra options as `field:value` entries
/// joined with `;`, where a value is one token or a `,`-separated list.
/// `None` means the rule has no extra parameters.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = rule)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Rule {
    /// UUID primary key.
    pub id: Uuid,
    /// Human friendly name of this kind of recursion.
    pub name: String,
    /// Short description of this type of recursion.
    pub description: String,
    /// Base recurrence period.
    pub frequency: Frequency,
    /// Serialized extra recurrence parameters, if any.
    pub params: Option<String>,
    /// When this rule was created.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Rule {
    /// ## Summary
    /// Parses the stored parameter text into typed recurrence parameters.
    ///
    /// The result is recomputed on every call; an absent `params` yields the
    /// empty parameter set.
    ///
    /// ## Errors
    /// Returns a parse error if a recognized field carries an undecodable
    /// value (bad `until` date, non-integer token, unknown weekday code).
    pub fn recurrence_params(&self) -> ParseResult<RecurParams> {
        RecurParams::parse(self.params.as_deref())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// New rule for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rule)]
pub struct NewRule<'a> {
    /// Human friendly name of this kind of recursion.
    pub name: &'a str,
    /// Short description of this type of recursion.
    pub description: &'a str,
    /// Base recurrence period.
    pub frequency: Frequency,
    /// Serialized extra recurrence parameters, if any.
    pub params: Option<&'a str>,
}

impl<'a> NewRule<'a> {
    /// Creates a new rule with no extra parameters.
    #[must_use]
    pub fn new(name: &'a str, description: &'a str, frequency: Frequency) -> Self {
        Self {
            name,
            description,
            frequency,
            params: None,
        }
    }

    /// Sets the serialized parameter text.
    #[must_use]
    pub fn with_params(mut self, params: &'a str) -> Self {
        self.params = Some(params);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use koyomi_recur::ParamField;

    fn sample_rule(params: Option<&str>) -> Rule {
        Rule {
            id: Uuid::now_v7(),
            name: "Weekly standup".to_string(),
            description: "Every Monday and Thursday".to_string(),
            frequency: Frequency::Weekly,
            params: params.map(String::from),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn recurrence_params_absent() {
        let rule = sample_rule(None);
        assert!(rule.recurrence_params().unwrap().is_empty());
    }

    #[test_log::test]
    fn recurrence_params_parsed_fresh() {
        let rule = sample_rule(Some("byday:MO,TH;interval:1"));
        let params = rule.recurrence_params().unwrap();
        assert_eq!(params.numbers(ParamField::Interval), Some(&[1][..]));
        assert_eq!(params.weekdays().map(<[_]>::len), Some(2));

        // No hidden state: parsing again yields an equal mapping.
        assert_eq!(rule.recurrence_params().unwrap(), params);
    }

    #[test]
    fn new_rule_builder() {
        let new_rule = NewRule::new("Daily", "Every day", Frequency::Daily).with_params("count:10");
        assert_eq!(new_rule.params, Some("count:10"));
        assert_eq!(new_rule.frequency, Frequency::Daily);
    }

    #[test]
    fn display_is_name() {
        let rule = sample_rule(None);
        assert_eq!(rule.to_string(), "Weekly standup");
    }
}
