use std::collections::HashMap;
use std::sync::Mutex;

use super::StorageDriver;

/// In-memory storage driver.
///
/// Used by tests and by embedders that do not want persistence across
/// process restarts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries. Handy for asserting cleanup in tests.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("storage lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageDriver for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("storage lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("storage lock poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .expect("storage lock poisoned")
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("token"), None);

        store.set("token", "abc");
        assert_eq!(store.get("token").as_deref(), Some("abc"));

        store.set("token", "def");
        assert_eq!(store.get("token").as_deref(), Some("def"));

        store.remove("token");
        assert_eq!(store.get("token"), None);
        assert!(store.is_empty());
    }
}
