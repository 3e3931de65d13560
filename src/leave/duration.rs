//! Duration derivation for proposed leave requests.
//!
//! Durations are computed once, before submission, and stored on the
//! record; editing a record goes through here again.

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::calendar::digits;
use crate::error::AppError;

/// Day count of a daily leave, inclusive of both endpoints.
///
/// An end date before the start date is rejected outright instead of
/// being absorbed via an absolute difference.
pub fn daily_days(start_date: NaiveDate, end_date: NaiveDate) -> Result<u32, AppError> {
    if end_date < start_date {
        return Err(AppError::Validation(
            "end date is before start date".to_string(),
        ));
    }
    Ok((end_date - start_date).num_days() as u32 + 1)
}

/// Minutes covered by an hourly leave; an inverted time range clamps to
/// zero rather than erroring.
pub fn hourly_minutes(start_time: NaiveTime, end_time: NaiveTime) -> i64 {
    let start = start_time.num_seconds_from_midnight() as i64 / 60;
    let end = end_time.num_seconds_from_midnight() as i64 / 60;
    (end - start).max(0)
}

pub fn hours_from_minutes(minutes: i64) -> f64 {
    minutes as f64 / 60.0
}

/// Parse a `HH:MM` time of day, accepting digits in either script.
pub fn parse_time(input: &str) -> Result<NaiveTime, AppError> {
    let ascii = digits::to_ascii_digits(input.trim());
    NaiveTime::parse_from_str(&ascii, "%H:%M")
        .map_err(|_| AppError::Validation(format!("invalid time of day: {}", input)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_inclusive_count() {
        assert_eq!(daily_days(date(2024, 4, 10), date(2024, 4, 10)).unwrap(), 1);
        assert_eq!(daily_days(date(2024, 4, 10), date(2024, 4, 11)).unwrap(), 2);
        assert_eq!(daily_days(date(2024, 4, 10), date(2024, 4, 16)).unwrap(), 7);
    }

    #[test]
    fn test_daily_inverted_range_rejected() {
        let err = daily_days(date(2024, 4, 11), date(2024, 4, 10)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_hourly_minutes() {
        let m = hourly_minutes(parse_time("08:00").unwrap(), parse_time("10:30").unwrap());
        assert_eq!(m, 150);
        assert_eq!(hours_from_minutes(m), 2.5);
    }

    #[test]
    fn test_hourly_inverted_range_clamps_to_zero() {
        let m = hourly_minutes(parse_time("10:30").unwrap(), parse_time("08:00").unwrap());
        assert_eq!(m, 0);
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("۰۸:۳۰").unwrap(), parse_time("08:30").unwrap());
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("8am").is_err());
    }
}
