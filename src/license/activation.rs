//! Activation state and the local validation rules.
//!
//! The remote validator is authoritative when reachable; every failure
//! on that path falls back silently to the local rules so the product
//! stays usable offline.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::store::{KvStore, StoreError, Tenant};

/// Global (unprefixed) storage keys.
pub const ACTIVATION_KEY: &str = "activation_status";
pub const DEVICE_ID_KEY: &str = "device_id";

const MIN_CODE_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivationSource {
    Local,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivationStatus {
    pub code: String,
    pub activated_at: DateTime<Utc>,
    /// None means the license never expires.
    pub expires_at: Option<DateTime<Utc>>,
    pub source: ActivationSource,
}

impl ActivationStatus {
    /// Whole days until expiry, clamped at zero; None for perpetual
    /// licenses.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at.map(|exp| (exp - now).num_days().max(0))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(exp) if exp <= now)
    }

    pub fn tenant(&self) -> Tenant {
        Tenant::Licensed(self.code.clone())
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub fn is_well_formed(code: &str) -> bool {
    code.len() >= MIN_CODE_LEN
        && code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
}

/// The offline validation rules: TRIAL codes run for one day, ADMIN
/// codes never expire, anything else well-formed gets a year.
pub fn validate_local(code: &str, now: DateTime<Utc>) -> Result<ActivationStatus, AppError> {
    let code = normalize_code(code);
    if !is_well_formed(&code) {
        return Err(AppError::Validation("activation code is not valid".to_string()));
    }

    let expires_at = if code.contains("ADMIN") {
        None
    } else if code.contains("TRIAL") {
        Some(now + Duration::days(1))
    } else {
        Some(now + Duration::days(365))
    };

    Ok(ActivationStatus { code, activated_at: now, expires_at, source: ActivationSource::Local })
}

/// Read the persisted status; an unreadable value is treated as absent
/// so one corrupted key cannot take every request down.
pub fn load_status(kv: &dyn KvStore) -> Result<Option<ActivationStatus>, StoreError> {
    match kv.get(ACTIVATION_KEY)? {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(status) => Ok(Some(status)),
            Err(e) => {
                tracing::warn!(error = %e, "activation status was unreadable; treating as inactive");
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

pub fn save_status(kv: &dyn KvStore, status: &ActivationStatus) -> Result<(), StoreError> {
    kv.set(ACTIVATION_KEY, &serde_json::to_string(status)?)
}

pub fn clear_status(kv: &dyn KvStore) -> Result<(), StoreError> {
    kv.remove(ACTIVATION_KEY)
}

/// The persisted device identity sent to the remote validator; created
/// on first use.
pub fn device_id(kv: &dyn KvStore) -> Result<String, StoreError> {
    if let Some(id) = kv.get(DEVICE_ID_KEY)? {
        return Ok(id);
    }
    let id = Uuid::new_v4().to_string();
    kv.set(DEVICE_ID_KEY, &id)?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trial_code_runs_one_day() {
        let now = Utc::now();
        let status = validate_local("trial-2024", now).unwrap();
        assert_eq!(status.code, "TRIAL-2024");
        assert_eq!(status.expires_at, Some(now + Duration::days(1)));
        assert_eq!(status.days_remaining(now), Some(1));
    }

    #[test]
    fn test_admin_code_never_expires() {
        let now = Utc::now();
        let status = validate_local("ADMIN-XYZ-1", now).unwrap();
        assert_eq!(status.expires_at, None);
        assert_eq!(status.days_remaining(now), None);
        assert!(!status.is_expired(now + Duration::days(10_000)));
    }

    #[test]
    fn test_plain_code_gets_a_year() {
        let now = Utc::now();
        let status = validate_local("AB12-CD34", now).unwrap();
        assert_eq!(status.expires_at, Some(now + Duration::days(365)));
    }

    #[test]
    fn test_malformed_codes_rejected() {
        let now = Utc::now();
        for code in ["", "SHORT", "BAD CODE!", "has_underscore_x"] {
            assert!(validate_local(code, now).is_err(), "{:?} should be rejected", code);
        }
    }

    #[test]
    fn test_expiry_clamps_at_zero() {
        let now = Utc::now();
        let status = ActivationStatus {
            code: "TRIAL-OLD".to_string(),
            activated_at: now - Duration::days(10),
            expires_at: Some(now - Duration::days(9)),
            source: ActivationSource::Local,
        };
        assert!(status.is_expired(now));
        assert_eq!(status.days_remaining(now), Some(0));
    }

    #[test]
    fn test_device_id_is_stable() {
        let kv = crate::store::MemoryStore::new();
        let first = device_id(&kv).unwrap();
        let second = device_id(&kv).unwrap();
        assert_eq!(first, second);
    }
}
