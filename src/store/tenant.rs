use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::kv::{KvStore, StoreError};
use crate::models::{Customer, Employee, LeaveRecord, Settings, User};

/// Collection names as they appear in storage keys.
pub mod collections {
    pub const EMPLOYEES: &str = "employees";
    pub const LEAVES: &str = "leaves";
    pub const USERS: &str = "users";
    pub const SETTINGS: &str = "settings";
    pub const AUDIT: &str = "system_logs_v2";
    pub const CUSTOMERS: &str = "customers";
    pub const LOGS: &str = "logs";
}

/// Which slice of the shared store is visible.
///
/// Each activation code owns an independent namespace; switching codes
/// switches the visible data without migrating or merging anything. The
/// super-administrator back office lives under a reserved prefix outside
/// tenant isolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tenant {
    Default,
    Licensed(String),
    SuperAdmin,
}

impl Tenant {
    pub fn prefix(&self) -> String {
        match self {
            Tenant::Default => "default_".to_string(),
            Tenant::Licensed(code) => format!("tenant_{}_", code),
            Tenant::SuperAdmin => "admin_".to_string(),
        }
    }

    /// The license code carried in session tokens; None for the default
    /// namespace.
    pub fn code(&self) -> Option<&str> {
        match self {
            Tenant::Licensed(code) => Some(code),
            _ => None,
        }
    }
}

/// Typed access to one tenant's collections.
///
/// Values are JSON documents stored whole under `prefix + collection`;
/// a read of a missing collection yields the type's default. Shapes are
/// checked here, at the storage boundary, so handlers only ever see
/// typed records.
#[derive(Clone)]
pub struct TenantStore {
    kv: Arc<dyn KvStore>,
    tenant: Tenant,
}

impl TenantStore {
    pub fn new(kv: Arc<dyn KvStore>, tenant: Tenant) -> Self {
        Self { kv, tenant }
    }

    pub fn tenant(&self) -> &Tenant {
        &self.tenant
    }

    pub fn key(&self, collection: &str) -> String {
        format!("{}{}", self.tenant.prefix(), collection)
    }

    pub fn load<T>(&self, collection: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        match self.kv.get(&self.key(collection))? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(T::default()),
        }
    }

    pub fn save<T: Serialize>(&self, collection: &str, value: &T) -> Result<(), StoreError> {
        self.kv.set(&self.key(collection), &serde_json::to_string(value)?)
    }

    pub fn save_raw(&self, collection: &str, raw: &str) -> Result<(), StoreError> {
        self.kv.set(&self.key(collection), raw)
    }

    pub fn load_raw(&self, collection: &str) -> Result<Option<String>, StoreError> {
        self.kv.get(&self.key(collection))
    }

    pub fn employees(&self) -> Result<Vec<Employee>, StoreError> {
        self.load(collections::EMPLOYEES)
    }

    pub fn save_employees(&self, employees: &[Employee]) -> Result<(), StoreError> {
        self.save(collections::EMPLOYEES, &employees)
    }

    pub fn leaves(&self) -> Result<Vec<LeaveRecord>, StoreError> {
        self.load(collections::LEAVES)
    }

    pub fn save_leaves(&self, leaves: &[LeaveRecord]) -> Result<(), StoreError> {
        self.save(collections::LEAVES, &leaves)
    }

    pub fn users(&self) -> Result<Vec<User>, StoreError> {
        self.load(collections::USERS)
    }

    pub fn save_users(&self, users: &[User]) -> Result<(), StoreError> {
        self.save(collections::USERS, &users)
    }

    pub fn settings(&self) -> Result<Settings, StoreError> {
        match self.kv.get(&self.key(collections::SETTINGS))? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Settings::default()),
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.save(collections::SETTINGS, settings)
    }

    pub fn customers(&self) -> Result<Vec<Customer>, StoreError> {
        self.load(collections::CUSTOMERS)
    }

    pub fn save_customers(&self, customers: &[Customer]) -> Result<(), StoreError> {
        self.save(collections::CUSTOMERS, &customers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Utc;
    use uuid::Uuid;

    fn employee(name: &str) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            first_name: name.to_string(),
            last_name: "تست".to_string(),
            employee_code: "100".to_string(),
            position: "کارشناس".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(Tenant::Default.prefix(), "default_");
        assert_eq!(Tenant::Licensed("AB-12345".to_string()).prefix(), "tenant_AB-12345_");
        assert_eq!(Tenant::SuperAdmin.prefix(), "admin_");
    }

    #[test]
    fn test_tenants_do_not_interact() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let a = TenantStore::new(kv.clone(), Tenant::Licensed("AAAA1111".to_string()));
        let b = TenantStore::new(kv.clone(), Tenant::Licensed("BBBB2222".to_string()));

        a.save_employees(&[employee("الف")]).unwrap();

        assert_eq!(a.employees().unwrap().len(), 1);
        assert!(b.employees().unwrap().is_empty());

        b.save_employees(&[employee("ب"), employee("ج")]).unwrap();
        assert_eq!(a.employees().unwrap().len(), 1);
        assert_eq!(b.employees().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_collection_defaults() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let store = TenantStore::new(kv, Tenant::Default);

        assert!(store.employees().unwrap().is_empty());
        assert_eq!(store.settings().unwrap().annual_leave_limit, 30);
    }
}
