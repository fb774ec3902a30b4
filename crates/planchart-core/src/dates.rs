//! Date expression parsing and effort-to-duration estimation.
//!
//! Upstream date fields are free text. Two families are understood:
//! absolute calendar dates in a handful of common formats, and relative
//! `"Week W (Day D)"` expressions anchored to the project start date.
//! Anything else is "no information" (`None`), never an error.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// Working hours per day used to convert effort estimates into durations.
pub const HOURS_PER_DAY: f64 = 8.0;

/// Absolute date formats, tried in order; the first that parses wins.
///
/// `%d/%m/%Y` is tried before `%m/%d/%Y`, so `"01/02/2024"` resolves to
/// February 1st. That ambiguity is pinned by tests; changing the order
/// silently reinterprets existing plans.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y"];

/// Datetime formats accepted after the date-only ones; the time part is
/// discarded.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

fn week_day_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)week\s*(\d+)\s*\(?\s*day\s*(\d+)\s*\)?").unwrap())
}

fn week_only_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)week\s*(\d+)").unwrap())
}

/// Parse a free-text date expression.
///
/// Tries absolute formats first, then the relative week/day notation
/// anchored at `start_base`. Empty or unparseable text yields `None`.
pub fn parse_date_expr(text: &str, start_base: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    parse_absolute(text).or_else(|| parse_week_day(text, start_base))
}

/// Parse an absolute date in any supported format.
pub fn parse_absolute(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(datetime.date());
        }
    }
    None
}

/// Resolve a relative `"Week W (Day D)"` expression.
///
/// `Week 2 (Day 3)` is `start_base + (2-1)*7 + (3-1)` days, with the day
/// clamped to 1..=7. `Week W` alone resolves to day 1 of that week.
pub fn parse_week_day(text: &str, start_base: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = week_day_re().captures(text) {
        let week: i64 = caps[1].parse().ok()?;
        let day: i64 = caps[2].parse().ok()?;
        let day = day.clamp(1, 7);
        return Some(start_base + Duration::days((week - 1) * 7 + (day - 1)));
    }
    if let Some(caps) = week_only_re().captures(text) {
        let week: i64 = caps[1].parse().ok()?;
        return Some(start_base + Duration::days((week - 1) * 7));
    }
    None
}

/// Convert an effort estimate in hours to a whole-day duration.
///
/// `ceil(hours / 8)`, floored at 1 day.
pub fn effort_days(hours: f64) -> i64 {
    ((hours / HOURS_PER_DAY).ceil()).max(1.0) as i64
}

/// Duration for a possibly-missing effort estimate.
///
/// Missing or zero hours substitute an 8-hour default (1 day). Negative
/// estimates pass through and floor at 1 day inside [`effort_days`].
pub fn effort_days_or_default(hours: Option<f64>) -> i64 {
    match hours {
        Some(h) if h != 0.0 => effort_days(h),
        _ => effort_days(HOURS_PER_DAY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    const BASE: fn() -> NaiveDate = || date(2024, 1, 1);

    #[test]
    fn absolute_iso_formats() {
        assert_eq!(parse_absolute("2024-03-05"), Some(date(2024, 3, 5)));
        assert_eq!(parse_absolute("2024/03/05"), Some(date(2024, 3, 5)));
    }

    #[test]
    fn absolute_datetime_formats_drop_time() {
        assert_eq!(
            parse_absolute("2024-03-05T14:30:00"),
            Some(date(2024, 3, 5))
        );
        assert_eq!(
            parse_absolute("2024-03-05 14:30:00"),
            Some(date(2024, 3, 5))
        );
    }

    #[test]
    fn ambiguous_slash_date_is_day_first() {
        // DD/MM/YYYY wins over MM/DD/YYYY: pinned, documented behavior.
        assert_eq!(parse_absolute("01/02/2024"), Some(date(2024, 2, 1)));
        // Day > 12 forces the MM/DD interpretation to apply instead.
        assert_eq!(parse_absolute("02/13/2024"), Some(date(2024, 2, 13)));
    }

    #[test]
    fn absolute_rejects_garbage() {
        assert_eq!(parse_absolute("soon"), None);
        assert_eq!(parse_absolute(""), None);
        assert_eq!(parse_absolute("2024-13-40"), None);
    }

    #[test]
    fn week_day_expression() {
        // Week 2 (Day 3) = base + 7 + 2
        assert_eq!(
            parse_date_expr("Week 2 (Day 3)", BASE()),
            Some(date(2024, 1, 10))
        );
    }

    #[test]
    fn week_only_resolves_to_first_day() {
        assert_eq!(parse_date_expr("Week 3", BASE()), Some(date(2024, 1, 15)));
    }

    #[test]
    fn week_day_is_case_and_spacing_insensitive() {
        assert_eq!(
            parse_date_expr("week 2 day 3", BASE()),
            Some(date(2024, 1, 10))
        );
        assert_eq!(
            parse_date_expr("WEEK 2 ( DAY 3 )", BASE()),
            Some(date(2024, 1, 10))
        );
        // Matches anywhere inside surrounding text
        assert_eq!(
            parse_date_expr("due in Week 2 (Day 3) at the latest", BASE()),
            Some(date(2024, 1, 10))
        );
    }

    #[test]
    fn week_day_with_comma_degrades_to_week_only() {
        // "Week 2, Day 3" does not fit the day pattern; the week-only rule
        // picks it up and lands on day 1 of the week.
        assert_eq!(
            parse_date_expr("Week 2, Day 3", BASE()),
            Some(date(2024, 1, 8))
        );
    }

    #[test]
    fn week_day_clamps_day_to_week() {
        // Day 9 clamps to 7
        assert_eq!(
            parse_date_expr("Week 1 (Day 9)", BASE()),
            Some(date(2024, 1, 7))
        );
        // Day 0 clamps to 1
        assert_eq!(
            parse_date_expr("Week 1 (Day 0)", BASE()),
            Some(date(2024, 1, 1))
        );
    }

    #[test]
    fn expr_prefers_absolute_over_relative() {
        assert_eq!(
            parse_date_expr("2024-06-01", BASE()),
            Some(date(2024, 6, 1))
        );
    }

    #[test]
    fn empty_and_blank_are_none() {
        assert_eq!(parse_date_expr("", BASE()), None);
        assert_eq!(parse_date_expr("   ", BASE()), None);
    }

    #[test]
    fn effort_days_ceiling() {
        assert_eq!(effort_days(10.0), 2);
        assert_eq!(effort_days(8.0), 1);
        assert_eq!(effort_days(17.0), 3);
    }

    #[test]
    fn effort_days_floors_at_one() {
        assert_eq!(effort_days(0.0), 1);
        assert_eq!(effort_days(0.5), 1);
        assert_eq!(effort_days(-4.0), 1);
    }

    #[test]
    fn effort_default_applies_for_missing_or_zero() {
        assert_eq!(effort_days_or_default(None), 1);
        assert_eq!(effort_days_or_default(Some(0.0)), 1);
        assert_eq!(effort_days_or_default(Some(20.0)), 3);
    }
}
