use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    audit,
    extractors::{permissions, AuthenticatedUser},
    models::{AuditAction, AuditEntity, Settings, UpdateSettingsInput},
    AppError, AppResult, AppState,
};

/// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Tenant settings", body = Settings)
    ),
    tag = "settings",
    security(("cookie_auth" = []))
)]
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
) -> AppResult<Json<Settings>> {
    Ok(Json(state.tenant_store().settings()?))
}

/// PUT /api/settings
#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = UpdateSettingsInput,
    responses(
        (status = 200, description = "Settings updated", body = Settings),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Invalid annual limit")
    ),
    tag = "settings",
    security(("cookie_auth" = []))
)]
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Json(input): Json<UpdateSettingsInput>,
) -> AppResult<Json<Settings>> {
    permissions::require_admin(&auth)?;

    if input.annual_leave_limit == 0 || input.annual_leave_limit > 366 {
        return Err(AppError::Validation(
            "annual leave limit must be between 1 and 366 days".to_string(),
        ));
    }

    let store = state.tenant_store();
    let mut settings = store.settings()?;
    settings.annual_leave_limit = input.annual_leave_limit;
    settings.updated_at = Some(Utc::now());
    store.save_settings(&settings)?;

    audit::record(
        state.audit.as_ref(),
        store.tenant(),
        &auth.audit_context(),
        AuditAction::Update,
        AuditEntity::Settings,
        Some(settings.id),
        format!("set annual leave limit to {} days", settings.annual_leave_limit),
    );

    Ok(Json(settings))
}
