//! The leave balance model.
//!
//! Everything is accounted in minutes. A working day is fixed at eight
//! hours, so the annual allowance is `limit_days * 480` minutes; daily
//! records draw `days * 480`, hourly records `hours * 60`. The remaining
//! balance is signed: direct edits can overdraw an employee past zero.
//!
//! Balances are recomputed from the current records on every request and
//! never cached or persisted.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::calendar::{self, CalendarError};
use crate::error::AppError;
use crate::models::{LeaveDetail, LeaveRecord};

pub const MINUTES_PER_HOUR: i64 = 60;
pub const MINUTES_PER_DAY: i64 = 8 * MINUTES_PER_HOUR;

/// Per-employee balance for one Jalaali year.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BalanceSummary {
    pub year: i32,
    pub allowed_minutes: i64,
    pub daily_minutes: i64,
    pub hourly_minutes: i64,
    pub consumed_minutes: i64,
    pub remaining_minutes: i64,
    /// Human-readable remaining balance in Persian script.
    pub remaining_display: String,
}

pub fn allowed_minutes(limit_days: u32) -> i64 {
    limit_days as i64 * MINUTES_PER_DAY
}

/// Minutes one record draws from the allowance.
pub fn record_minutes(record: &LeaveRecord) -> i64 {
    match &record.detail {
        LeaveDetail::Daily { days } => *days as i64 * MINUTES_PER_DAY,
        LeaveDetail::Hourly { hours, .. } => (hours * MINUTES_PER_HOUR as f64).round() as i64,
    }
}

/// Aggregate one employee's records against the annual limit.
///
/// Only records whose start date falls in the given Jalaali year count;
/// with no matching records the full allowance remains.
pub fn summarize(
    records: &[LeaveRecord],
    year: i32,
    limit_days: u32,
) -> Result<BalanceSummary, CalendarError> {
    let allowed = allowed_minutes(limit_days);
    let mut daily = 0i64;
    let mut hourly = 0i64;

    for record in records {
        if calendar::to_jalaali(record.start_date)?.year != year {
            continue;
        }
        match &record.detail {
            LeaveDetail::Daily { .. } => daily += record_minutes(record),
            LeaveDetail::Hourly { .. } => hourly += record_minutes(record),
        }
    }

    let consumed = daily + hourly;
    let remaining = allowed - consumed;

    Ok(BalanceSummary {
        year,
        allowed_minutes: allowed,
        daily_minutes: daily,
        hourly_minutes: hourly,
        consumed_minutes: consumed,
        remaining_minutes: remaining,
        remaining_display: format_minutes(remaining),
    })
}

/// Decline a submission that would overdraw the balance.
pub fn ensure_balance(required_minutes: i64, remaining_minutes: i64) -> Result<(), AppError> {
    if required_minutes > remaining_minutes {
        return Err(AppError::Validation(format!(
            "insufficient leave balance: requested {} minutes, {} remaining",
            required_minutes, remaining_minutes
        )));
    }
    Ok(())
}

/// Render a minute count as days/hours/minutes in Persian script.
///
/// Whole days come off first (480 each), then whole hours, then leftover
/// minutes; the non-zero parts are joined with «و». Zero renders as
/// «۰ دقیقه» and negative balances get a «منفی» prefix.
pub fn format_minutes(minutes: i64) -> String {
    let magnitude = minutes.abs();
    let days = magnitude / MINUTES_PER_DAY;
    let hours = (magnitude % MINUTES_PER_DAY) / MINUTES_PER_HOUR;
    let mins = magnitude % MINUTES_PER_HOUR;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{} روز", calendar::to_persian_digits(&days.to_string())));
    }
    if hours > 0 {
        parts.push(format!("{} ساعت", calendar::to_persian_digits(&hours.to_string())));
    }
    if mins > 0 {
        parts.push(format!("{} دقیقه", calendar::to_persian_digits(&mins.to_string())));
    }
    if parts.is_empty() {
        parts.push("۰ دقیقه".to_string());
    }

    let joined = parts.join(" و ");
    if minutes < 0 {
        format!("منفی {}", joined)
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeaveCategory;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    fn record(start: NaiveDate, detail: LeaveDetail) -> LeaveRecord {
        LeaveRecord {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            category: LeaveCategory::Entitled,
            start_date: start,
            end_date: start,
            description: None,
            detail,
            created_at: Utc::now(),
            created_by: "admin".to_string(),
            modified: false,
            updated_at: None,
            updated_by: None,
        }
    }

    #[test]
    fn test_empty_records_leave_full_allowance() {
        let summary = summarize(&[], 1403, 30).unwrap();
        assert_eq!(summary.consumed_minutes, 0);
        assert_eq!(summary.remaining_minutes, 14_400);
    }

    #[test]
    fn test_thirty_day_limit_scenario() {
        // One two-day record in 1403 leaves 28 days of the 30-day limit.
        let start = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
        let records = vec![record(start, LeaveDetail::Daily { days: 2 })];

        let summary = summarize(&records, 1403, 30).unwrap();
        assert_eq!(summary.allowed_minutes, 14_400);
        assert_eq!(summary.consumed_minutes, 960);
        assert_eq!(summary.remaining_minutes, 13_440);
        assert_eq!(summary.remaining_display, "۲۸ روز");
    }

    #[test]
    fn test_year_filter_uses_jalaali_year() {
        // 2024-03-19 is the last day of 1402; 2024-03-20 opens 1403.
        let records = vec![
            record(NaiveDate::from_ymd_opt(2024, 3, 19).unwrap(), LeaveDetail::Daily { days: 1 }),
            record(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(), LeaveDetail::Daily { days: 3 }),
        ];

        let y1402 = summarize(&records, 1402, 30).unwrap();
        assert_eq!(y1402.consumed_minutes, 480);

        let y1403 = summarize(&records, 1403, 30).unwrap();
        assert_eq!(y1403.consumed_minutes, 1440);
    }

    #[test]
    fn test_daily_hourly_split_and_identity() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let records = vec![
            record(start, LeaveDetail::Daily { days: 2 }),
            record(
                start,
                LeaveDetail::Hourly {
                    start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                    end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
                    hours: 2.5,
                },
            ),
        ];

        let summary = summarize(&records, 1403, 30).unwrap();
        assert_eq!(summary.daily_minutes, 960);
        assert_eq!(summary.hourly_minutes, 150);
        // consumed + remaining == allowed holds for any record set.
        assert_eq!(summary.consumed_minutes + summary.remaining_minutes, summary.allowed_minutes);
    }

    #[test]
    fn test_identity_holds_when_overdrawn() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let records = vec![record(start, LeaveDetail::Daily { days: 40 })];

        let summary = summarize(&records, 1403, 30).unwrap();
        assert!(summary.remaining_minutes < 0);
        assert_eq!(summary.consumed_minutes + summary.remaining_minutes, summary.allowed_minutes);
    }

    #[test]
    fn test_format_decomposition_property() {
        for m in (0..20_000).step_by(7) {
            let days = m / MINUTES_PER_DAY;
            let hours = (m % MINUTES_PER_DAY) / MINUTES_PER_HOUR;
            let mins = m % MINUTES_PER_HOUR;
            assert_eq!(days * 480 + hours * 60 + mins, m);
            assert!(hours < 8);
            assert!(mins < 60);
        }
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "۰ دقیقه");
        assert_eq!(format_minutes(13_440), "۲۸ روز");
        assert_eq!(format_minutes(150), "۲ ساعت و ۳۰ دقیقه");
        assert_eq!(format_minutes(485), "۱ روز و ۵ دقیقه");
        assert_eq!(format_minutes(-60), "منفی ۱ ساعت");
    }

    #[test]
    fn test_ensure_balance() {
        assert!(ensure_balance(150, 150).is_ok());
        assert!(ensure_balance(151, 150).is_err());
    }
}
