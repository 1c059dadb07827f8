//! Helper functions for expanding stored recurrence rules into occurrence dates.

use chrono::{DateTime, Utc};
use rrule::{RRule, RRuleSet, Tz, Unvalidated};

use koyomi_db::model::rule::Rule;
use koyomi_recur::{Frequency, ParamField, ParamValue, RecurParams, Weekday};

use crate::error::{ServiceError, ServiceResult};

/// Occurrences expanded from a recurrence rule.
#[derive(Debug, Clone)]
pub struct Occurrences {
    /// Occurrence dates in UTC, in order.
    pub dates: Vec<DateTime<Utc>>,
    /// Whether expansion stopped at the requested limit.
    pub limited: bool,
}

/// ## Summary
/// Renders a frequency and parsed parameters as RRULE content parts,
/// the textual interface of the recurrence engine.
///
/// This is not a serializer back to the stored parameter format; the engine
/// consumes `NAME=value` parts joined with `;`.
///
/// ## Errors
/// Returns a validation error if a `wkst` value is not a single weekday
/// index in 0..=6.
pub fn rrule_parts(frequency: Frequency, params: &RecurParams) -> ServiceResult<String> {
    let mut parts = vec![format!("FREQ={frequency}")];

    for (field, value) in params.iter() {
        match value {
            ParamValue::Until(until) => {
                parts.push(format!("UNTIL={}", until.format("%Y%m%dT%H%M%SZ")));
            }
            ParamValue::Weekdays(days) => {
                let codes: Vec<&str> = days.iter().map(|day| day.code()).collect();
                parts.push(format!("BYDAY={}", codes.join(",")));
            }
            ParamValue::Numbers(numbers) => {
                parts.push(render_numeric_part(field, numbers)?);
            }
        }
    }

    Ok(parts.join(";"))
}

fn render_numeric_part(field: ParamField, numbers: &[i64]) -> ServiceResult<String> {
    let name = match field {
        ParamField::Count => "COUNT",
        ParamField::Interval => "INTERVAL",
        ParamField::ByMinute => "BYMINUTE",
        ParamField::ByHour => "BYHOUR",
        ParamField::ByMonthDay => "BYMONTHDAY",
        ParamField::ByYearDay => "BYYEARDAY",
        ParamField::ByWeekNo => "BYWEEKNO",
        ParamField::ByMonth => "BYMONTH",
        ParamField::BySetPos => "BYSETPOS",
        ParamField::Wkst => {
            let day = week_start(numbers)?;
            return Ok(format!("WKST={}", day.code()));
        }
        ParamField::Until | ParamField::ByWeekday => {
            return Err(ServiceError::InvariantViolation(
                "numeric value stored under a non-numeric field",
            ));
        }
    };

    let list: Vec<String> = numbers.iter().map(ToString::to_string).collect();
    Ok(format!("{}={}", name, list.join(",")))
}

/// Maps a `wkst` value to its weekday, 0 = Monday through 6 = Sunday.
fn week_start(numbers: &[i64]) -> ServiceResult<Weekday> {
    let &[index] = numbers else {
        return Err(ServiceError::ValidationError(format!(
            "wkst takes a single weekday index, got {numbers:?}"
        )));
    };

    u8::try_from(index)
        .ok()
        .and_then(Weekday::from_index)
        .ok_or_else(|| {
            ServiceError::ValidationError(format!("week start index out of range: {index}"))
        })
}

/// ## Summary
/// Builds a validated recurrence set for a rule anchored at `dt_start`.
///
/// ## Errors
/// Returns a validation error if the recurrence engine rejects the
/// assembled rule.
pub fn build_rrule_set(
    frequency: Frequency,
    params: &RecurParams,
    dt_start: DateTime<Utc>,
) -> ServiceResult<RRuleSet> {
    let rrule_text = rrule_parts(frequency, params)?;
    tracing::trace!(rrule = %rrule_text, "Assembled RRULE");

    let rrule = rrule_text
        .parse::<RRule<Unvalidated>>()
        .map_err(|err| ServiceError::ValidationError(err.to_string()))?;
    let rrule_set = rrule
        .build(dt_start.with_timezone(&Tz::UTC))
        .map_err(|err| ServiceError::ValidationError(err.to_string()))?;

    Ok(rrule_set)
}

/// ## Summary
/// Expands a rule into at most `limit` occurrence dates from `dt_start`.
///
/// ## Errors
/// Returns a validation error if the recurrence engine rejects the rule.
pub fn occurrences(
    frequency: Frequency,
    params: &RecurParams,
    dt_start: DateTime<Utc>,
    limit: u16,
) -> ServiceResult<Occurrences> {
    let rrule_set = build_rrule_set(frequency, params, dt_start)?;
    let result = rrule_set.all(limit);
    tracing::trace!(
        count = result.dates.len(),
        limited = result.limited,
        "Expanded occurrences"
    );

    Ok(Occurrences {
        dates: result
            .dates
            .into_iter()
            .map(|date| date.with_timezone(&Utc))
            .collect(),
        limited: result.limited,
    })
}

/// ## Summary
/// Expands a stored rule into occurrence dates: parses its parameter text
/// and feeds the result to the recurrence engine.
///
/// ## Errors
/// Returns a parse error if the stored parameter text is invalid, or a
/// validation error if the recurrence engine rejects the rule.
pub fn rule_occurrences(
    rule: &Rule,
    dt_start: DateTime<Utc>,
    limit: u16,
) -> ServiceResult<Occurrences> {
    let params = rule.recurrence_params()?;
    occurrences(rule.frequency.into(), &params, dt_start, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use koyomi_db::db::enums;
    use uuid::Uuid;

    fn utc(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec).unwrap()
    }

    fn params(raw: &str) -> RecurParams {
        RecurParams::parse(Some(raw)).unwrap()
    }

    #[test]
    fn rrule_parts_renders_fields() {
        let text = rrule_parts(Frequency::Weekly, &params("count:3;byday:MO,WE")).unwrap();
        assert_eq!(text, "FREQ=WEEKLY;COUNT=3;BYDAY=MO,WE");
    }

    #[test]
    fn rrule_parts_renders_wkst_code() {
        let text = rrule_parts(Frequency::Weekly, &params("count:3;wkst:6")).unwrap();
        assert_eq!(text, "FREQ=WEEKLY;COUNT=3;WKST=SU");
    }

    #[test]
    fn rrule_parts_rejects_wkst_out_of_range() {
        let result = rrule_parts(Frequency::Weekly, &params("wkst:9"));
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));

        let result = rrule_parts(Frequency::Weekly, &params("wkst:0,1"));
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[test_log::test]
    fn daily_count_expansion() {
        let result =
            occurrences(Frequency::Daily, &params("count:3"), utc(2012, 2, 1, 9, 30, 0), 100)
                .unwrap();
        assert_eq!(
            result.dates,
            vec![
                utc(2012, 2, 1, 9, 30, 0),
                utc(2012, 2, 2, 9, 30, 0),
                utc(2012, 2, 3, 9, 30, 0),
            ]
        );
        assert!(!result.limited);
    }

    #[test]
    fn weekly_byday_expansion() {
        let result = occurrences(
            Frequency::Weekly,
            &params("count:3;byday:TU,TH"),
            utc(1997, 9, 2, 9, 0, 0),
            100,
        )
        .unwrap();
        assert_eq!(
            result.dates,
            vec![
                utc(1997, 9, 2, 9, 0, 0),
                utc(1997, 9, 4, 9, 0, 0),
                utc(1997, 9, 9, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn monthly_bymonthday_expansion() {
        let result = occurrences(
            Frequency::Monthly,
            &params("count:3;bymonthday:1"),
            utc(2012, 1, 1, 9, 0, 0),
            100,
        )
        .unwrap();
        assert_eq!(
            result.dates,
            vec![
                utc(2012, 1, 1, 9, 0, 0),
                utc(2012, 2, 1, 9, 0, 0),
                utc(2012, 3, 1, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn biweekly_interval_expansion() {
        let result = occurrences(
            Frequency::Weekly,
            &params("count:3;interval:2"),
            utc(1997, 9, 2, 9, 0, 0),
            100,
        )
        .unwrap();
        assert_eq!(
            result.dates,
            vec![
                utc(1997, 9, 2, 9, 0, 0),
                utc(1997, 9, 16, 9, 0, 0),
                utc(1997, 9, 30, 9, 0, 0),
            ]
        );
    }

    #[test]
    fn until_bounds_expansion() {
        let result = occurrences(
            Frequency::Daily,
            &params("until:20120203T093000Z"),
            utc(2012, 2, 1, 9, 30, 0),
            100,
        )
        .unwrap();
        assert_eq!(
            result.dates,
            vec![
                utc(2012, 2, 1, 9, 30, 0),
                utc(2012, 2, 2, 9, 30, 0),
                utc(2012, 2, 3, 9, 30, 0),
            ]
        );
    }

    #[test]
    fn unbounded_expansion_is_limited() {
        let result = occurrences(
            Frequency::Daily,
            &RecurParams::parse(None).unwrap(),
            utc(2012, 2, 1, 9, 30, 0),
            5,
        )
        .unwrap();
        assert_eq!(result.dates.len(), 5);
        assert!(result.limited);
    }

    fn stored_rule(frequency: enums::Frequency, raw_params: Option<&str>) -> Rule {
        Rule {
            id: Uuid::now_v7(),
            name: "test".to_string(),
            description: "test rule".to_string(),
            frequency,
            params: raw_params.map(String::from),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test_log::test]
    fn rule_occurrences_end_to_end() {
        let rule = stored_rule(enums::Frequency::Daily, Some("count:2"));
        let result = rule_occurrences(&rule, utc(2018, 2, 15, 14, 30, 0), 100).unwrap();
        assert_eq!(
            result.dates,
            vec![utc(2018, 2, 15, 14, 30, 0), utc(2018, 2, 16, 14, 30, 0)]
        );
    }

    #[test]
    fn rule_occurrences_surfaces_parse_errors() {
        let rule = stored_rule(enums::Frequency::Daily, Some("byminute:x"));
        let result = rule_occurrences(&rule, utc(2018, 2, 15, 14, 30, 0), 100);
        assert!(matches!(result, Err(ServiceError::ParseError(_))));
    }
}
