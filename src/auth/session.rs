use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::AppError;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_TTL_HOURS: i64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionRole {
    Admin,
    User,
    SuperAdmin,
}

/// What a session token carries.
///
/// The tenant is pinned at login time: a token minted against one
/// activation code stops working once another code becomes active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub username: String,
    pub role: SessionRole,
    /// Active license code at login; None for the default namespace.
    pub tenant: Option<String>,
    pub session_id: Uuid,
    pub exp: i64,
}

/// Generate a session token.
/// Token format: base64(claims_json) + "." + hmac_signature
pub fn issue_token(claims: &SessionClaims, secret: &str) -> Result<String, AppError> {
    let payload = STANDARD.encode(
        serde_json::to_vec(claims)
            .map_err(|e| AppError::Internal(format!("claims serialization error: {}", e)))?,
    );
    let signature = create_hmac_signature(&payload, secret)?;
    Ok(format!("{}.{}", payload, signature))
}

/// Validate a session token and extract its claims.
/// Returns the claims if the signature checks out and the token has not
/// expired.
pub fn validate_token(token: &str, secret: &str) -> Result<SessionClaims, AppError> {
    let (payload, signature) = token
        .split_once('.')
        .ok_or_else(|| AppError::Unauthorized("invalid token structure".to_string()))?;

    let expected = create_hmac_signature(payload, secret)?;

    // Constant-time comparison to prevent timing attacks
    if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
        return Err(AppError::Unauthorized("invalid session token".to_string()));
    }

    let decoded = STANDARD
        .decode(payload)
        .map_err(|_| AppError::Unauthorized("invalid token encoding".to_string()))?;

    let claims: SessionClaims = serde_json::from_slice(&decoded)
        .map_err(|_| AppError::Unauthorized("invalid token payload".to_string()))?;

    if chrono::Utc::now().timestamp() > claims.exp {
        return Err(AppError::Unauthorized("session has expired".to_string()));
    }

    Ok(claims)
}

/// Create HMAC-SHA256 signature for the given data
fn create_hmac_signature(data: &str, secret: &str) -> Result<String, AppError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(format!("HMAC initialization error: {}", e)))?;

    mac.update(data.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp_offset: i64) -> SessionClaims {
        SessionClaims {
            user_id: Uuid::new_v4(),
            username: "admin".to_string(),
            role: SessionRole::Admin,
            tenant: Some("CODE-1234".to_string()),
            session_id: Uuid::new_v4(),
            exp: chrono::Utc::now().timestamp() + exp_offset,
        }
    }

    #[test]
    fn test_issue_and_validate_token() {
        let secret = "test_secret_key_for_testing_purposes";
        let claims = claims(3600);

        let token = issue_token(&claims, secret).unwrap();
        let validated = validate_token(&token, secret).unwrap();

        assert_eq!(validated.user_id, claims.user_id);
        assert_eq!(validated.username, "admin");
        assert_eq!(validated.role, SessionRole::Admin);
        assert_eq!(validated.tenant.as_deref(), Some("CODE-1234"));
    }

    #[test]
    fn test_invalid_token_format() {
        let result = validate_token("invalid_token", "test_secret_key");
        assert!(result.is_err());
    }

    #[test]
    fn test_token_with_wrong_secret() {
        let token = issue_token(&claims(3600), "test_secret_key").unwrap();
        let result = validate_token(&token, "wrong_secret_key");
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue_token(&claims(-60), "test_secret_key").unwrap();
        let result = validate_token(&token, "test_secret_key");
        assert!(result.is_err());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let secret = "test_secret_key";
        let token = issue_token(&claims(3600), secret).unwrap();
        let (_, sig) = token.split_once('.').unwrap();

        let forged_payload = STANDARD.encode(b"{\"role\":\"super_admin\"}");
        let forged = format!("{}.{}", forged_payload, sig);
        assert!(validate_token(&forged, secret).is_err());
    }
}
