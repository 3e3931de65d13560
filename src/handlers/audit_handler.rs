use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::{
    extractors::{permissions, AuthenticatedUser},
    models::{AuditAction, AuditEntity, AuditLogEntry},
    AppResult, AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct GetAuditQuery {
    pub action: Option<AuditAction>,
    pub entity: Option<AuditEntity>,
}

/// GET /api/audit?action=&entity=
#[utoipa::path(
    get,
    path = "/api/audit",
    params(GetAuditQuery),
    responses(
        (status = 200, description = "Audit entries for the active tenant, newest first", body = Vec<AuditLogEntry>),
        (status = 403, description = "Admin role required")
    ),
    tag = "audit",
    security(("cookie_auth" = []))
)]
pub async fn get_audit(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Query(query): Query<GetAuditQuery>,
) -> AppResult<Json<Vec<AuditLogEntry>>> {
    permissions::require_admin(&auth)?;

    let mut entries = state.audit.entries(&state.active_tenant())?;

    if let Some(action) = query.action {
        entries.retain(|e| e.action == action);
    }
    if let Some(entity) = query.entity {
        entries.retain(|e| e.entity == entity);
    }

    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(Json(entries))
}
