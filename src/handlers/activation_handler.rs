use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    extractors::{permissions, AuthenticatedUser},
    license::activation::{self, ActivationSource, ActivationStatus},
    AppError, AppResult, AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivationStatusResponse {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Whole days left; absent for perpetual licenses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ActivationSource>,
    pub expired: bool,
}

impl ActivationStatusResponse {
    fn inactive() -> Self {
        Self {
            active: false,
            code: None,
            activated_at: None,
            expires_at: None,
            days_remaining: None,
            source: None,
            expired: false,
        }
    }

    fn from_status(status: &ActivationStatus, now: DateTime<Utc>) -> Self {
        Self {
            active: true,
            code: Some(status.code.clone()),
            activated_at: Some(status.activated_at),
            expires_at: status.expires_at,
            days_remaining: status.days_remaining(now),
            source: Some(status.source),
            expired: status.is_expired(now),
        }
    }
}

/// GET /api/activation
#[utoipa::path(
    get,
    path = "/api/activation",
    responses(
        (status = 200, description = "Current activation state", body = ActivationStatusResponse)
    ),
    tag = "activation"
)]
pub async fn get_activation(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ActivationStatusResponse>> {
    let response = match activation::load_status(state.kv.as_ref())? {
        Some(status) => ActivationStatusResponse::from_status(&status, Utc::now()),
        None => ActivationStatusResponse::inactive(),
    };
    Ok(Json(response))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActivateInput {
    pub code: String,
}

/// POST /api/activation
///
/// Tries the remote validator first; any failure on that path falls back
/// silently to the local rules so activation keeps working offline.
/// Activating a code switches the visible tenant to that code's
/// namespace.
#[utoipa::path(
    post,
    path = "/api/activation",
    request_body = ActivateInput,
    responses(
        (status = 200, description = "Application activated", body = ActivationStatusResponse),
        (status = 422, description = "Code rejected")
    ),
    tag = "activation"
)]
pub async fn activate(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ActivateInput>,
) -> AppResult<Json<ActivationStatusResponse>> {
    let now = Utc::now();
    let code = activation::normalize_code(&input.code);
    let device_id = activation::device_id(state.kv.as_ref())?;

    let status = match state.activation.validate(&code, &device_id).await {
        Ok(Some(remote)) if remote.valid => ActivationStatus {
            code: code.clone(),
            activated_at: now,
            expires_at: remote.expires_at,
            source: ActivationSource::Remote,
        },
        Ok(Some(remote)) => {
            let message =
                remote.message.unwrap_or_else(|| "activation code rejected".to_string());
            return Err(AppError::Validation(message));
        }
        Ok(None) => activation::validate_local(&code, now)?,
        Err(reason) => {
            tracing::warn!(reason, "remote validation unavailable; using local rules");
            activation::validate_local(&code, now)?
        }
    };

    activation::save_status(state.kv.as_ref(), &status)?;
    tracing::info!(code = %status.code, source = ?status.source, "application activated");

    Ok(Json(ActivationStatusResponse::from_status(&status, now)))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeactivateResponse {
    pub success: bool,
}

/// DELETE /api/activation
///
/// Clears the activation state and returns the default namespace; the
/// licensed tenant's data stays in storage untouched.
#[utoipa::path(
    delete,
    path = "/api/activation",
    responses(
        (status = 200, description = "Activation cleared", body = DeactivateResponse),
        (status = 403, description = "Admin role required")
    ),
    tag = "activation",
    security(("cookie_auth" = []))
)]
pub async fn deactivate(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> AppResult<Json<DeactivateResponse>> {
    permissions::require_admin(&auth)?;
    activation::clear_status(state.kv.as_ref())?;
    Ok(Json(DeactivateResponse { success: true }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RequestCodeInput {
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestCodeResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/activation/request-code
///
/// Issues a one-time numeric code and dispatches it by email. Dispatch
/// failures are logged and swallowed; the request still succeeds.
#[utoipa::path(
    post,
    path = "/api/activation/request-code",
    request_body = RequestCodeInput,
    responses(
        (status = 200, description = "Code issued", body = RequestCodeResponse),
        (status = 422, description = "Invalid email")
    ),
    tag = "activation"
)]
pub async fn request_code(
    State(state): State<Arc<AppState>>,
    Json(input): Json<RequestCodeInput>,
) -> AppResult<Json<RequestCodeResponse>> {
    let email = input.email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("a valid email address is required".to_string()));
    }

    let code = state.otp.issue(&email).await;

    if let Err(reason) = state.sender.send(&email, &code).await {
        tracing::warn!(reason, email, "one-time code dispatch failed");
    }

    Ok(Json(RequestCodeResponse {
        success: true,
        message: "verification code sent".to_string(),
    }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyCodeInput {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyCodeResponse {
    pub success: bool,
}

/// POST /api/activation/verify-code
#[utoipa::path(
    post,
    path = "/api/activation/verify-code",
    request_body = VerifyCodeInput,
    responses(
        (status = 200, description = "Code accepted", body = VerifyCodeResponse),
        (status = 422, description = "Code mismatch or expired")
    ),
    tag = "activation"
)]
pub async fn verify_code(
    State(state): State<Arc<AppState>>,
    Json(input): Json<VerifyCodeInput>,
) -> AppResult<Json<VerifyCodeResponse>> {
    if state.otp.verify(input.email.trim(), &input.code).await {
        Ok(Json(VerifyCodeResponse { success: true }))
    } else {
        Err(AppError::Validation("verification code does not match".to_string()))
    }
}
