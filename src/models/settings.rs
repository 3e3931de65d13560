use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEFAULT_ANNUAL_LEAVE_LIMIT: u32 = 30;

/// Tenant-wide settings; a single row per tenant.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Settings {
    pub id: Uuid,
    /// Annual leave allowance in whole working days.
    pub annual_leave_limit: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            annual_leave_limit: DEFAULT_ANNUAL_LEAVE_LIMIT,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Input DTO for updating settings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateSettingsInput {
    pub annual_leave_limit: u32,
}
