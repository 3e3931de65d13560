use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::kv::StoreError;
use super::tenant::{collections, TenantStore};

pub const BACKUP_VERSION: u32 = 2;

/// Collections included in a backup, in export order.
const BACKED_UP: [&str; 5] = [
    collections::EMPLOYEES,
    collections::LEAVES,
    collections::SETTINGS,
    collections::USERS,
    collections::AUDIT,
];

/// The downloadable backup file for one tenant.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BackupDocument {
    pub version: u32,
    pub timestamp: DateTime<Utc>,
    #[schema(value_type = Object)]
    pub data: Map<String, Value>,
}

/// Snapshot the tenant's collections into a backup document.
pub fn export(store: &TenantStore) -> Result<BackupDocument, StoreError> {
    let mut data = Map::new();
    for name in BACKED_UP {
        if let Some(raw) = store.load_raw(name)? {
            // The audit log is stored as an encoded string, not JSON;
            // keep whatever shape the key holds.
            let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
            data.insert(name.to_string(), value);
        }
    }
    Ok(BackupDocument { version: BACKUP_VERSION, timestamp: Utc::now(), data })
}

/// Restore a backup by overwriting matching keys.
///
/// Validation stops at presence of `data`; collection contents are
/// written back verbatim and unknown keys inside `data` are ignored.
/// There is no rollback for partially applied restores.
pub fn restore(store: &TenantStore, document: &Value) -> Result<usize, StoreError> {
    let data = document.get("data").and_then(Value::as_object).ok_or_else(|| {
        StoreError::Serialization(<serde_json::Error as serde::de::Error>::custom(
            "missing data object",
        ))
    })?;

    let mut written = 0;
    for name in BACKED_UP {
        if let Some(value) = data.get(name) {
            let raw = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            store.save_raw(name, &raw)?;
            written += 1;
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KvStore, MemoryStore, Tenant};
    use std::sync::Arc;

    fn store() -> TenantStore {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        TenantStore::new(kv, Tenant::Licensed("CODE1234".to_string()))
    }

    #[test]
    fn test_export_then_restore() {
        let a = store();
        a.save_raw(collections::EMPLOYEES, r#"[{"id":"x"}]"#).unwrap();
        a.save_raw(collections::SETTINGS, r#"{"annual_leave_limit":25}"#).unwrap();
        a.save_raw(collections::AUDIT, "bm90LWpzb24=").unwrap();

        let doc = export(&a).unwrap();
        assert_eq!(doc.version, BACKUP_VERSION);

        let b = store();
        let value = serde_json::to_value(&doc).unwrap();
        let written = restore(&b, &value).unwrap();
        assert_eq!(written, 3);
        assert_eq!(b.load_raw(collections::EMPLOYEES).unwrap().as_deref(), Some(r#"[{"id":"x"}]"#));
        assert_eq!(b.load_raw(collections::AUDIT).unwrap().as_deref(), Some("bm90LWpzb24="));
    }

    #[test]
    fn test_restore_requires_data() {
        let s = store();
        let err = restore(&s, &serde_json::json!({"version": 2}));
        assert!(err.is_err());
    }

    #[test]
    fn test_restore_ignores_unknown_keys() {
        let s = store();
        let written =
            restore(&s, &serde_json::json!({"data": {"employees": [], "bogus": 1}})).unwrap();
        assert_eq!(written, 1);
        assert!(s.load_raw("bogus").unwrap().is_none());
    }
}
