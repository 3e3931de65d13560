pub mod backup;
pub mod file;
pub mod kv;
pub mod memory;
pub mod tenant;

pub use backup::{BackupDocument, BACKUP_VERSION};
pub use file::FileStore;
pub use kv::{KvStore, StoreError};
pub use memory::MemoryStore;
pub use tenant::{Tenant, TenantStore};
