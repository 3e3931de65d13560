use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    audit,
    extractors::{permissions, AuthenticatedUser},
    models::{
        AuditAction, AuditEntity, CreateUserInput, UpdateUserInput, User, UserMutationResponse,
        UserView,
    },
    AppError, AppResult, AppState,
};

/// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "List of tenant users", body = Vec<UserView>),
        (status = 403, description = "Admin role required")
    ),
    tag = "users",
    security(("cookie_auth" = []))
)]
pub async fn get_users(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> AppResult<Json<Vec<UserView>>> {
    permissions::require_admin(&auth)?;

    let users = state.tenant_store().users()?;
    Ok(Json(users.iter().map(UserView::from).collect()))
}

/// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserInput,
    responses(
        (status = 200, description = "User created", body = UserView),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Username already taken"),
        (status = 422, description = "Missing required field")
    ),
    tag = "users",
    security(("cookie_auth" = []))
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Json(input): Json<CreateUserInput>,
) -> AppResult<Json<UserView>> {
    permissions::require_admin(&auth)?;

    let username = input.username.trim().to_string();
    if username.is_empty() {
        return Err(AppError::Validation("username is required".to_string()));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
        return Err(AppError::Validation(
            "username may only contain letters, digits, '_' and '.'".to_string(),
        ));
    }
    if input.password.is_empty() {
        return Err(AppError::Validation("password is required".to_string()));
    }

    let store = state.tenant_store();
    let mut users = store.users()?;

    if users.iter().any(|u| u.username.eq_ignore_ascii_case(&username)) {
        return Err(AppError::Conflict("username already taken".to_string()));
    }

    let user = User {
        id: Uuid::new_v4(),
        username,
        password: input.password,
        role: input.role,
        created_at: Utc::now(),
    };

    let view = UserView::from(&user);
    users.push(user);
    store.save_users(&users)?;

    audit::record(
        state.audit.as_ref(),
        store.tenant(),
        &auth.audit_context(),
        AuditAction::Create,
        AuditEntity::User,
        Some(view.id),
        format!("created user {}", view.username),
    );

    Ok(Json(view))
}

/// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserInput,
    responses(
        (status = 200, description = "User updated", body = UserView),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    ),
    tag = "users",
    security(("cookie_auth" = []))
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<UserView>> {
    permissions::require_admin(&auth)?;

    let store = state.tenant_store();
    let mut users = store.users()?;
    let user = users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    if let Some(password) = input.password {
        if password.is_empty() {
            return Err(AppError::Validation("password must not be empty".to_string()));
        }
        user.password = password;
    }
    if let Some(role) = input.role {
        user.role = role;
    }

    let view = UserView::from(&*user);
    store.save_users(&users)?;

    audit::record(
        state.audit.as_ref(),
        store.tenant(),
        &auth.audit_context(),
        AuditAction::Update,
        AuditEntity::User,
        Some(id),
        format!("updated user {}", view.username),
    );

    Ok(Json(view))
}

/// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = UserMutationResponse),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Cannot delete own account")
    ),
    tag = "users",
    security(("cookie_auth" = []))
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserMutationResponse>> {
    permissions::require_admin(&auth)?;

    if id == auth.user_id {
        return Err(AppError::Validation("cannot delete own account".to_string()));
    }

    let store = state.tenant_store();
    let mut users = store.users()?;
    let user = users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    users.retain(|u| u.id != id);
    store.save_users(&users)?;

    audit::record(
        state.audit.as_ref(),
        store.tenant(),
        &auth.audit_context(),
        AuditAction::Delete,
        AuditEntity::User,
        Some(id),
        format!("deleted user {}", user.username),
    );

    Ok(Json(UserMutationResponse { success: true, message: None }))
}
