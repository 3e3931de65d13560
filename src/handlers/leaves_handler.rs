use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    audit, calendar,
    calendar::JalaaliDate,
    extractors::AuthenticatedUser,
    leave,
    models::{
        AuditAction, AuditEntity, CreateLeaveInput, LeaveDetail, LeaveKind, LeaveMutationResponse,
        LeaveRecord, UpdateLeaveInput,
    },
    AppError, AppResult, AppState,
};

fn parse_jalaali_date(input: &str) -> Result<NaiveDate, AppError> {
    let date = JalaaliDate::parse(input)?;
    Ok(calendar::to_gregorian(&date)?)
}

fn derive_daily(start: NaiveDate, end: NaiveDate) -> Result<(LeaveDetail, i64), AppError> {
    let days = leave::daily_days(start, end)?;
    Ok((LeaveDetail::Daily { days }, days as i64 * leave::MINUTES_PER_DAY))
}

fn derive_hourly(start_time: NaiveTime, end_time: NaiveTime) -> (LeaveDetail, i64) {
    let minutes = leave::hourly_minutes(start_time, end_time);
    let detail = LeaveDetail::Hourly {
        start_time,
        end_time,
        hours: leave::hours_from_minutes(minutes),
    };
    (detail, minutes)
}

/// Decline the submission unless the employee still has the required
/// minutes available in the record's Jalaali year. `exclude` skips the
/// record being edited so it does not count against itself.
fn check_balance(
    records: &[LeaveRecord],
    employee_id: Uuid,
    exclude: Option<Uuid>,
    start_date: NaiveDate,
    required_minutes: i64,
    limit_days: u32,
) -> Result<(), AppError> {
    let year = calendar::to_jalaali(start_date)?.year;
    let others: Vec<LeaveRecord> = records
        .iter()
        .filter(|r| r.employee_id == employee_id && Some(r.id) != exclude)
        .cloned()
        .collect();
    let summary = leave::summarize(&others, year, limit_days)?;
    leave::ensure_balance(required_minutes, summary.remaining_minutes)
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct GetLeavesQuery {
    #[serde(rename = "employeeId")]
    pub employee_id: Option<Uuid>,
    /// Jalaali year of the start date.
    pub year: Option<i32>,
}

/// GET /api/leaves?employeeId=&year=
#[utoipa::path(
    get,
    path = "/api/leaves",
    params(GetLeavesQuery),
    responses(
        (status = 200, description = "Leave records, optionally filtered by employee and Jalaali year", body = Vec<LeaveRecord>)
    ),
    tag = "leaves",
    security(("cookie_auth" = []))
)]
pub async fn get_leaves(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
    Query(query): Query<GetLeavesQuery>,
) -> AppResult<Json<Vec<LeaveRecord>>> {
    let mut leaves = state.tenant_store().leaves()?;

    if let Some(employee_id) = query.employee_id {
        leaves.retain(|l| l.employee_id == employee_id);
    }
    if let Some(year) = query.year {
        let mut filtered = Vec::with_capacity(leaves.len());
        for record in leaves {
            if calendar::to_jalaali(record.start_date)?.year == year {
                filtered.push(record);
            }
        }
        leaves = filtered;
    }

    leaves.sort_by_key(|l| l.start_date);
    Ok(Json(leaves))
}

/// POST /api/leaves
///
/// Derives the duration from the submitted range and declines the
/// request when the employee's remaining balance cannot cover it.
#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body = CreateLeaveInput,
    responses(
        (status = 200, description = "Leave recorded", body = LeaveRecord),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Invalid range or insufficient balance")
    ),
    tag = "leaves",
    security(("cookie_auth" = []))
)]
pub async fn create_leave(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Json(input): Json<CreateLeaveInput>,
) -> AppResult<Json<LeaveRecord>> {
    let store = state.tenant_store();

    if !store.employees()?.iter().any(|e| e.id == input.employee_id) {
        return Err(AppError::NotFound("employee not found".to_string()));
    }

    let start_date = parse_jalaali_date(&input.start_date)?;
    let end_date = parse_jalaali_date(&input.end_date)?;

    let (detail, required_minutes) = match input.kind {
        LeaveKind::Daily => derive_daily(start_date, end_date)?,
        LeaveKind::Hourly => {
            let (start_raw, end_raw) = match (&input.start_time, &input.end_time) {
                (Some(start), Some(end)) => (start, end),
                _ => {
                    return Err(AppError::Validation(
                        "start and end time are required for hourly leave".to_string(),
                    ))
                }
            };
            derive_hourly(leave::parse_time(start_raw)?, leave::parse_time(end_raw)?)
        }
    };

    let leaves = store.leaves()?;
    let limit = store.settings()?.annual_leave_limit;
    check_balance(&leaves, input.employee_id, None, start_date, required_minutes, limit)?;

    let record = LeaveRecord {
        id: Uuid::new_v4(),
        employee_id: input.employee_id,
        category: input.category,
        start_date,
        end_date,
        description: input.description.filter(|d| !d.trim().is_empty()),
        detail,
        created_at: Utc::now(),
        created_by: auth.username.clone(),
        modified: false,
        updated_at: None,
        updated_by: None,
    };

    let mut leaves = leaves;
    leaves.push(record.clone());
    store.save_leaves(&leaves)?;

    audit::record(
        state.audit.as_ref(),
        store.tenant(),
        &auth.audit_context(),
        AuditAction::Create,
        AuditEntity::Leave,
        Some(record.id),
        format!("recorded leave for employee {}", record.employee_id),
    );

    Ok(Json(record))
}

/// PUT /api/leaves/{id}
///
/// Changing any part of the range re-derives the stored duration and
/// re-checks the balance against the employee's other records.
#[utoipa::path(
    put,
    path = "/api/leaves/{id}",
    params(
        ("id" = Uuid, Path, description = "Leave record ID")
    ),
    request_body = UpdateLeaveInput,
    responses(
        (status = 200, description = "Leave updated", body = LeaveRecord),
        (status = 404, description = "Leave record not found"),
        (status = 422, description = "Invalid range or insufficient balance")
    ),
    tag = "leaves",
    security(("cookie_auth" = []))
)]
pub async fn update_leave(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateLeaveInput>,
) -> AppResult<Json<LeaveRecord>> {
    let store = state.tenant_store();
    let mut leaves = store.leaves()?;

    let position = leaves
        .iter()
        .position(|l| l.id == id)
        .ok_or_else(|| AppError::NotFound("leave record not found".to_string()))?;
    let current = leaves[position].clone();

    let start_date = match &input.start_date {
        Some(raw) => parse_jalaali_date(raw)?,
        None => current.start_date,
    };
    let end_date = match &input.end_date {
        Some(raw) => parse_jalaali_date(raw)?,
        None => current.end_date,
    };

    let (detail, required_minutes) = match &current.detail {
        LeaveDetail::Daily { .. } => derive_daily(start_date, end_date)?,
        LeaveDetail::Hourly { start_time, end_time, .. } => {
            let start_time = match &input.start_time {
                Some(raw) => leave::parse_time(raw)?,
                None => *start_time,
            };
            let end_time = match &input.end_time {
                Some(raw) => leave::parse_time(raw)?,
                None => *end_time,
            };
            derive_hourly(start_time, end_time)
        }
    };

    let limit = store.settings()?.annual_leave_limit;
    check_balance(&leaves, current.employee_id, Some(id), start_date, required_minutes, limit)?;

    let record = &mut leaves[position];
    record.start_date = start_date;
    record.end_date = end_date;
    record.detail = detail;
    if let Some(category) = input.category {
        record.category = category;
    }
    if let Some(description) = input.description {
        record.description = if description.trim().is_empty() { None } else { Some(description) };
    }
    record.modified = true;
    record.updated_at = Some(Utc::now());
    record.updated_by = Some(auth.username.clone());

    let updated = record.clone();
    store.save_leaves(&leaves)?;

    audit::record(
        state.audit.as_ref(),
        store.tenant(),
        &auth.audit_context(),
        AuditAction::Update,
        AuditEntity::Leave,
        Some(id),
        format!("updated leave for employee {}", updated.employee_id),
    );

    Ok(Json(updated))
}

/// DELETE /api/leaves/{id}
#[utoipa::path(
    delete,
    path = "/api/leaves/{id}",
    params(
        ("id" = Uuid, Path, description = "Leave record ID")
    ),
    responses(
        (status = 200, description = "Leave deleted", body = LeaveMutationResponse),
        (status = 404, description = "Leave record not found")
    ),
    tag = "leaves",
    security(("cookie_auth" = []))
)]
pub async fn delete_leave(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LeaveMutationResponse>> {
    let store = state.tenant_store();
    let mut leaves = store.leaves()?;

    let record = leaves
        .iter()
        .find(|l| l.id == id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("leave record not found".to_string()))?;

    leaves.retain(|l| l.id != id);
    store.save_leaves(&leaves)?;

    audit::record(
        state.audit.as_ref(),
        store.tenant(),
        &auth.audit_context(),
        AuditAction::Delete,
        AuditEntity::Leave,
        Some(id),
        format!("deleted leave for employee {}", record.employee_id),
    );

    Ok(Json(LeaveMutationResponse { success: true, leave_id: Some(id), message: None }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeaveCategory;
    use chrono::Utc;

    fn hourly_record(employee_id: Uuid, start_date: NaiveDate, hours: f64) -> LeaveRecord {
        LeaveRecord {
            id: Uuid::new_v4(),
            employee_id,
            category: LeaveCategory::Entitled,
            start_date,
            end_date: start_date,
            description: None,
            detail: LeaveDetail::Hourly {
                start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                hours,
            },
            created_at: Utc::now(),
            created_by: "admin".to_string(),
            modified: false,
            updated_at: None,
            updated_by: None,
        }
    }

    #[test]
    fn test_hourly_submission_gate() {
        // 08:00 to 10:30 is 2.5 hours, 150 required minutes.
        let (detail, required) = derive_hourly(
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
        );
        assert_eq!(required, 150);
        assert!(matches!(detail, LeaveDetail::Hourly { hours, .. } if hours == 2.5));

        let employee_id = Uuid::new_v4();
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        // 1 day of allowance minus 330 consumed minutes leaves exactly 150.
        let records = vec![hourly_record(employee_id, start, 5.5)];
        assert!(check_balance(&records, employee_id, None, start, 150, 1).is_ok());

        // One more consumed minute and the same request is declined.
        let records = vec![hourly_record(employee_id, start, 5.5 + 1.0 / 60.0)];
        let err = check_balance(&records, employee_id, None, start, 150, 1).unwrap_err();
        assert!(err.to_string().contains("insufficient leave balance"));
    }

    #[test]
    fn test_editing_excludes_own_consumption() {
        let employee_id = Uuid::new_v4();
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let record = hourly_record(employee_id, start, 8.0);
        let id = record.id;

        // The full allowance is spent, but editing the spending record
        // itself still fits because it is excluded from the check.
        let records = vec![record];
        assert!(check_balance(&records, employee_id, Some(id), start, 480, 1).is_ok());
        assert!(check_balance(&records, employee_id, None, start, 480, 1).is_err());
    }

    #[test]
    fn test_jalaali_date_parsing() {
        let date = parse_jalaali_date("۱۴۰۳/۰۱/۰۱").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
        assert!(parse_jalaali_date("1403-01-01").is_err());
    }
}
