use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    extractors::{permissions, AuthenticatedUser},
    store::{backup, BackupDocument},
    AppResult, AppState,
};

/// GET /api/backup
#[utoipa::path(
    get,
    path = "/api/backup",
    responses(
        (status = 200, description = "Backup document for the active tenant", body = BackupDocument),
        (status = 403, description = "Admin role required")
    ),
    tag = "backup",
    security(("cookie_auth" = []))
)]
pub async fn export_backup(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> AppResult<Json<BackupDocument>> {
    permissions::require_admin(&auth)?;
    Ok(Json(backup::export(&state.tenant_store())?))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestoreResponse {
    pub success: bool,
    pub collections_restored: usize,
}

/// POST /api/backup/restore
///
/// Overwrites matching keys with the uploaded collections. Validation
/// stops at presence of `data`; anything beyond that is the uploader's
/// responsibility, and a partially applied restore is not rolled back.
#[utoipa::path(
    post,
    path = "/api/backup/restore",
    responses(
        (status = 200, description = "Collections restored", body = RestoreResponse),
        (status = 403, description = "Admin role required"),
        (status = 500, description = "Document missing the data object")
    ),
    tag = "backup",
    security(("cookie_auth" = []))
)]
pub async fn restore_backup(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Json(document): Json<Value>,
) -> AppResult<Json<RestoreResponse>> {
    permissions::require_admin(&auth)?;

    let written = backup::restore(&state.tenant_store(), &document)?;
    tracing::info!(collections = written, "backup restored");

    Ok(Json(RestoreResponse { success: true, collections_restored: written }))
}
