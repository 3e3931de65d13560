use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

use crate::audit::AuditContext;
use crate::auth::{self, SessionRole};
use crate::models::Role;
use crate::AppState;

/// Extracts the session token from either the session cookie (frontend)
/// or the Authorization header (testing)
fn extract_token_from_request(parts: &Parts) -> Option<String> {
    if let Some(cookie_header) = parts.headers.get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                let cookie = cookie.trim();
                if let Some(value) = cookie.strip_prefix("session=") {
                    return Some(value.to_string());
                }
            }
        }
    }

    if let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    None
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: SessionRole,
    pub session_id: Uuid,
    pub is_super_admin: bool,
    /// User-Agent of the calling client, recorded into audit entries.
    pub client_info: String,
}

impl AuthenticatedUser {
    pub fn audit_context(&self) -> AuditContext {
        AuditContext {
            user_id: self.user_id,
            username: self.username.clone(),
            session_id: self.session_id,
            client_info: self.client_info.clone(),
        }
    }
}

type Rejection = (StatusCode, axum::Json<serde_json::Value>);

fn unauthorized(message: &str) -> Rejection {
    (StatusCode::UNAUTHORIZED, axum::Json(json!({"error": message})))
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = Rejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = extract_token_from_request(parts);
        let client_info = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let state = state.clone();

        async move {
            let token = token.ok_or_else(|| {
                unauthorized("Missing authentication: no session cookie or Authorization header")
            })?;

            let claims = auth::validate_token(&token, &state.config.session_secret)
                .map_err(|e| unauthorized(&e.to_string()))?;

            // A token is pinned to the license code it was minted under;
            // switching the active code invalidates old sessions.
            let active_code = state.active_tenant().code().map(str::to_string);
            if claims.role != SessionRole::SuperAdmin && claims.tenant != active_code {
                return Err(unauthorized("session does not match the active license"));
            }

            if claims.role == SessionRole::SuperAdmin {
                return Ok(AuthenticatedUser {
                    user_id: claims.user_id,
                    username: claims.username,
                    role: SessionRole::SuperAdmin,
                    session_id: claims.session_id,
                    is_super_admin: true,
                    client_info,
                });
            }

            // Role comes from the stored user so revocations and role
            // changes take effect on the next request, not next login.
            let users = state.tenant_store().users().map_err(|e| {
                tracing::error!(error = %e, "failed to load users during authentication");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(json!({"error": "operation failed"})),
                )
            })?;

            let user = users
                .iter()
                .find(|u| u.id == claims.user_id)
                .ok_or_else(|| unauthorized("user no longer exists"))?;

            let role = match user.role {
                Role::Admin => SessionRole::Admin,
                Role::User => SessionRole::User,
            };

            Ok(AuthenticatedUser {
                user_id: user.id,
                username: user.username.clone(),
                role,
                session_id: claims.session_id,
                is_super_admin: false,
                client_info,
            })
        }
    }
}
