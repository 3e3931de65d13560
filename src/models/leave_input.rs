use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::leave::LeaveCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeaveKind {
    Daily,
    Hourly,
}

/// Input DTO for submitting a leave request.
///
/// Dates arrive as Jalaali `YYYY/MM/DD` strings (either digit script),
/// times as `HH:MM`; times are required for hourly requests and ignored
/// for daily ones.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateLeaveInput {
    pub employee_id: Uuid,
    pub kind: LeaveKind,
    pub category: LeaveCategory,
    pub start_date: String,
    pub end_date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub description: Option<String>,
}

/// Input DTO for editing a leave request; omitted fields keep their
/// current value. Changing any part of the range re-derives the duration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateLeaveInput {
    pub category: Option<LeaveCategory>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub description: Option<String>,
}

/// Response after leave mutations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveMutationResponse {
    pub success: bool,
    pub leave_id: Option<Uuid>,
    pub message: Option<String>,
}
