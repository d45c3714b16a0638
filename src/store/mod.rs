//! Persistent key-value storage port.
//!
//! Everything the client persists (session token, cached accounts, remembered
//! credentials) goes through the `StorageDriver` trait so the rest of the
//! crate never touches the filesystem directly and tests can run against an
//! in-memory fake.
//!
//! Drivers are intentionally infallible at the API level: a storage failure
//! means "no persisted value", never a fatal error.

pub mod file;
pub mod memory;

use std::sync::Arc;

pub use file::FileStore;
pub use memory::MemoryStore;

/// String-keyed, string-valued persistent storage.
pub trait StorageDriver: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Remove the value stored under `key`, if any.
    fn remove(&self, key: &str);
}

/// Shared handle to a storage driver.
pub type SharedStorage = Arc<dyn StorageDriver>;
