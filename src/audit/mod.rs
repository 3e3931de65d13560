//! Append-only audit logging.
//!
//! The sink is a capability handed around through [`crate::AppState`]
//! rather than a process-wide singleton; handlers record exactly one
//! entry per entity mutation plus login/logout events. Entries live in
//! the tenant's `system_logs_v2` key as base64 over the JSON array (the
//! back office writes to `admin_logs` under the reserved prefix).

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use uuid::Uuid;

use crate::models::{AuditAction, AuditEntity, AuditLogEntry};
use crate::store::tenant::collections;
use crate::store::{KvStore, StoreError, Tenant};

/// Who is acting, carried from the authenticated session.
#[derive(Debug, Clone)]
pub struct AuditContext {
    pub user_id: Uuid,
    pub username: String,
    pub session_id: Uuid,
    pub client_info: String,
}

pub trait AuditSink: Send + Sync {
    fn append(&self, tenant: &Tenant, entry: AuditLogEntry) -> Result<(), StoreError>;
    fn entries(&self, tenant: &Tenant) -> Result<Vec<AuditLogEntry>, StoreError>;
}

/// Build and append one entry; failures are logged and swallowed so a
/// mutation never fails after its write already happened.
pub fn record(
    sink: &dyn AuditSink,
    tenant: &Tenant,
    ctx: &AuditContext,
    action: AuditAction,
    entity: AuditEntity,
    entity_id: Option<Uuid>,
    details: impl Into<String>,
) {
    let entry = AuditLogEntry {
        id: Uuid::new_v4(),
        user_id: ctx.user_id,
        username: ctx.username.clone(),
        action,
        entity,
        entity_id,
        details: details.into(),
        timestamp: Utc::now(),
        session_id: ctx.session_id,
        client_info: ctx.client_info.clone(),
        ip: "Local".to_string(),
    };

    if let Err(e) = sink.append(tenant, entry) {
        tracing::warn!(error = %e, "failed to append audit entry");
    }
}

/// Audit sink backed by the shared key-value store.
pub struct StoreAuditSink {
    kv: Arc<dyn KvStore>,
}

impl StoreAuditSink {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    fn key(tenant: &Tenant) -> String {
        match tenant {
            Tenant::SuperAdmin => format!("{}{}", tenant.prefix(), collections::LOGS),
            other => format!("{}{}", other.prefix(), collections::AUDIT),
        }
    }

    fn decode(raw: &str) -> Vec<AuditLogEntry> {
        let parsed = STANDARD
            .decode(raw)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok());
        match parsed {
            Some(entries) => entries,
            None => {
                // A corrupted log loses its history rather than blocking
                // every subsequent mutation.
                tracing::warn!("audit log was unreadable; starting a fresh one");
                Vec::new()
            }
        }
    }

    fn encode(entries: &[AuditLogEntry]) -> Result<String, StoreError> {
        Ok(STANDARD.encode(serde_json::to_vec(entries)?))
    }
}

impl AuditSink for StoreAuditSink {
    fn append(&self, tenant: &Tenant, entry: AuditLogEntry) -> Result<(), StoreError> {
        let key = Self::key(tenant);
        let mut entries = match self.kv.get(&key)? {
            Some(raw) => Self::decode(&raw),
            None => Vec::new(),
        };
        entries.push(entry);
        self.kv.set(&key, &Self::encode(&entries)?)
    }

    fn entries(&self, tenant: &Tenant) -> Result<Vec<AuditLogEntry>, StoreError> {
        match self.kv.get(&Self::key(tenant))? {
            Some(raw) => Ok(Self::decode(&raw)),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn ctx() -> AuditContext {
        AuditContext {
            user_id: Uuid::new_v4(),
            username: "admin".to_string(),
            session_id: Uuid::new_v4(),
            client_info: "test".to_string(),
        }
    }

    #[test]
    fn test_append_and_read_back() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let sink = StoreAuditSink::new(kv.clone());
        let tenant = Tenant::Licensed("CODE1234".to_string());

        record(
            &sink,
            &tenant,
            &ctx(),
            AuditAction::Create,
            AuditEntity::Employee,
            Some(Uuid::new_v4()),
            "created employee",
        );
        record(&sink, &tenant, &ctx(), AuditAction::Login, AuditEntity::User, None, "login");

        let entries = sink.entries(&tenant).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, AuditAction::Create);
        assert_eq!(entries[0].ip, "Local");

        // Stored value is base64 over the JSON array.
        let raw = kv.get("tenant_CODE1234_system_logs_v2").unwrap().unwrap();
        let decoded = STANDARD.decode(raw).unwrap();
        assert!(serde_json::from_slice::<Vec<AuditLogEntry>>(&decoded).is_ok());
    }

    #[test]
    fn test_super_admin_writes_to_admin_logs() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let sink = StoreAuditSink::new(kv.clone());

        record(
            &sink,
            &Tenant::SuperAdmin,
            &ctx(),
            AuditAction::Create,
            AuditEntity::User,
            None,
            "registered customer",
        );

        assert!(kv.get("admin_logs").unwrap().is_some());
    }

    #[test]
    fn test_corrupted_log_resets() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        kv.set("default_system_logs_v2", "not-base64!!").unwrap();

        let sink = StoreAuditSink::new(kv);
        assert!(sink.entries(&Tenant::Default).unwrap().is_empty());
    }
}
