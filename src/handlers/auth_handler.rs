use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    audit::{self, AuditContext},
    auth::{self, SessionClaims, SessionRole, SESSION_TTL_HOURS},
    extractors::AuthenticatedUser,
    license::activation,
    models::{AuditAction, AuditEntity, Role},
    AppError, AppResult, AppState,
};

fn password_matches(provided: &str, stored: &str) -> bool {
    provided.as_bytes().ct_eq(stored.as_bytes()).into()
}

fn client_info(headers: &HeaderMap) -> String {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
    pub role: SessionRole,
}

/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginInput,
    responses(
        (status = 200, description = "Session issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials or expired activation")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<LoginResponse>> {
    let now = Utc::now();
    let session_id = Uuid::new_v4();
    let exp = (now + Duration::hours(SESSION_TTL_HOURS)).timestamp();

    // The super administrator is a fixed account outside tenant isolation.
    if input.username == state.config.super_admin_username {
        if !password_matches(&input.password, &state.config.super_admin_password) {
            return Err(AppError::Unauthorized("invalid username or password".to_string()));
        }

        let claims = SessionClaims {
            user_id: Uuid::nil(),
            username: input.username.clone(),
            role: SessionRole::SuperAdmin,
            tenant: None,
            session_id,
            exp,
        };
        let token = auth::issue_token(&claims, &state.config.session_secret)?;

        audit::record(
            state.audit.as_ref(),
            &crate::store::Tenant::SuperAdmin,
            &AuditContext {
                user_id: Uuid::nil(),
                username: input.username.clone(),
                session_id,
                client_info: client_info(&headers),
            },
            AuditAction::Login,
            AuditEntity::User,
            None,
            "super administrator logged in",
        );

        return Ok(Json(LoginResponse {
            token,
            user_id: Uuid::nil(),
            username: input.username,
            role: SessionRole::SuperAdmin,
        }));
    }

    // An expired license blocks regular logins; data stays in place.
    if let Some(status) = activation::load_status(state.kv.as_ref())? {
        if status.is_expired(now) {
            return Err(AppError::Unauthorized("activation has expired".to_string()));
        }
    }

    let store = state.tenant_store();
    let users = store.users()?;
    let user = users
        .iter()
        .find(|u| u.username == input.username)
        .filter(|u| password_matches(&input.password, &u.password))
        .ok_or_else(|| AppError::Unauthorized("invalid username or password".to_string()))?;

    let role = match user.role {
        Role::Admin => SessionRole::Admin,
        Role::User => SessionRole::User,
    };
    let claims = SessionClaims {
        user_id: user.id,
        username: user.username.clone(),
        role,
        tenant: store.tenant().code().map(str::to_string),
        session_id,
        exp,
    };
    let token = auth::issue_token(&claims, &state.config.session_secret)?;

    audit::record(
        state.audit.as_ref(),
        store.tenant(),
        &AuditContext {
            user_id: user.id,
            username: user.username.clone(),
            session_id,
            client_info: client_info(&headers),
        },
        AuditAction::Login,
        AuditEntity::User,
        Some(user.id),
        "user logged in",
    );

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        username: user.username.clone(),
        role,
    }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
}

/// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session closed", body = LogoutResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("cookie_auth" = []))
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<LogoutResponse>> {
    let tenant = if auth_user.is_super_admin {
        crate::store::Tenant::SuperAdmin
    } else {
        state.active_tenant()
    };

    audit::record(
        state.audit.as_ref(),
        &tenant,
        &auth_user.audit_context(),
        AuditAction::Logout,
        AuditEntity::User,
        Some(auth_user.user_id),
        "user logged out",
    );

    Ok(Json(LogoutResponse { success: true }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub username: String,
    pub role: SessionRole,
}

/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current authenticated user", body = MeResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("cookie_auth" = []))
)]
pub async fn get_me(auth_user: AuthenticatedUser) -> AppResult<Json<MeResponse>> {
    Ok(Json(MeResponse {
        user_id: auth_user.user_id,
        username: auth_user.username,
        role: auth_user.role,
    }))
}
