use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeaveCategory {
    /// استحقاقی
    Entitled,
    /// استعلاجی
    Medical,
}

/// Kind-specific fields of a leave record.
///
/// `days`/`hours` are derived from the range when the record is created
/// or edited and stored as-is afterwards; they are never recomputed on
/// read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeaveDetail {
    Daily {
        days: u32,
    },
    Hourly {
        start_time: NaiveTime,
        end_time: NaiveTime,
        hours: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub category: LeaveCategory,
    /// Gregorian storage dates; the Jalaali year of `start_date` decides
    /// which year's allowance the record draws from.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub detail: LeaveDetail,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    #[serde(default)]
    pub modified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serialization() {
        let record = LeaveRecord {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            category: LeaveCategory::Entitled,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 25).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 26).unwrap(),
            description: None,
            detail: LeaveDetail::Daily { days: 2 },
            created_at: Utc::now(),
            created_by: "admin".to_string(),
            modified: false,
            updated_at: None,
            updated_by: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "daily");
        assert_eq!(json["days"], 2);

        let back: LeaveRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.detail, LeaveDetail::Daily { days: 2 });
    }

    #[test]
    fn test_hourly_round_trip() {
        let detail = LeaveDetail::Hourly {
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            hours: 2.5,
        };
        let json = serde_json::to_string(&detail).unwrap();
        let back: LeaveDetail = serde_json::from_str(&json).unwrap();
        assert_eq!(back, detail);
    }
}
