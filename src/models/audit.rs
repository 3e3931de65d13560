use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntity {
    Employee,
    Leave,
    User,
    Settings,
    /// Back-office customer registry; only appears in the admin log.
    Customer,
}

/// One append-only audit log entry. Every create/update/delete of an
/// entity produces exactly one of these; logins and logouts are recorded
/// too.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub action: AuditAction,
    pub entity: AuditEntity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<Uuid>,
    pub details: String,
    pub timestamp: DateTime<Utc>,
    pub session_id: Uuid,
    pub client_info: String,
    /// Always "Local"; kept for compatibility with the exported shape.
    pub ip: String,
}
