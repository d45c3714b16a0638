use std::marker::PhantomData;

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::store::SharedStorage;

/// Consider cached data stale after 1 day.
/// The cache only exists to skip a redundant fetch on reload; anything older
/// must come from the server again.
const CACHE_TTL_DAYS: i64 = 1;

/// TTL-bound cache of a collection, keyed by an owner identifier.
///
/// The payload and its expiry marker are stored under separate keys but are
/// always written and cleared together, so a payload can never outlive its
/// freshness information.
pub struct TimedCache<T> {
    storage: SharedStorage,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> TimedCache<T> {
    pub fn new(storage: SharedStorage, name: &'static str) -> Self {
        Self {
            storage,
            name,
            _marker: PhantomData,
        }
    }

    fn payload_key(&self, owner: &str) -> String {
        format!("{}_{}", self.name, owner)
    }

    fn expiry_key(&self, owner: &str) -> String {
        format!("{}_{}_expiration", self.name, owner)
    }

    /// Return the cached items for `owner` if present and unexpired.
    ///
    /// A missing, stale, or unparseable entry reads back as an empty
    /// sequence; stale and corrupt entries are cleared on the spot.
    pub fn load(&self, owner: &str) -> Vec<T> {
        let payload = self.storage.get(&self.payload_key(owner));
        let expiry = self.storage.get(&self.expiry_key(owner));

        let (payload, expiry) = match (payload, expiry) {
            (Some(payload), Some(expiry)) => (payload, expiry),
            // Half an entry is as good as none
            _ => return Vec::new(),
        };

        match expiry.parse::<DateTime<Utc>>() {
            Ok(expires_at) if Utc::now() <= expires_at => {}
            Ok(_) => {
                debug!(cache = self.name, owner, "Cached data expired, clearing");
                self.clear(owner);
                return Vec::new();
            }
            Err(e) => {
                warn!(cache = self.name, owner, error = %e, "Corrupt expiry marker, clearing");
                self.clear(owner);
                return Vec::new();
            }
        }

        match serde_json::from_str(&payload) {
            Ok(items) => items,
            Err(e) => {
                warn!(cache = self.name, owner, error = %e, "Corrupt cached payload, clearing");
                self.clear(owner);
                Vec::new()
            }
        }
    }

    /// Replace the cached items for `owner`, stamping a fresh expiry marker.
    pub fn save(&self, owner: &str, items: &[T]) {
        let payload = match serde_json::to_string(items) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(cache = self.name, owner, error = %e, "Failed to serialize cache payload");
                return;
            }
        };

        let expires_at = Utc::now() + Duration::days(CACHE_TTL_DAYS);
        self.storage.set(&self.payload_key(owner), &payload);
        self.storage
            .set(&self.expiry_key(owner), &expires_at.to_rfc3339());
    }

    /// Remove both the payload and the expiry marker for `owner`.
    pub fn clear(&self, owner: &str) {
        self.storage.remove(&self.payload_key(owner));
        self.storage.remove(&self.expiry_key(owner));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{MemoryStore, StorageDriver};

    fn cache_over(storage: Arc<MemoryStore>) -> TimedCache<String> {
        TimedCache::new(storage, "accounts")
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        let storage = Arc::new(MemoryStore::new());
        let cache = cache_over(storage);

        let items = vec!["checking".to_string(), "savings".to_string()];
        cache.save("u1", &items);
        assert_eq!(cache.load("u1"), items);
    }

    #[test]
    fn test_load_missing_owner_is_empty() {
        let storage = Arc::new(MemoryStore::new());
        let cache = cache_over(storage);
        assert!(cache.load("u1").is_empty());
    }

    #[test]
    fn test_owners_are_independent() {
        let storage = Arc::new(MemoryStore::new());
        let cache = cache_over(storage);

        cache.save("u1", &["a".to_string()]);
        cache.save("u2", &["b".to_string()]);
        assert_eq!(cache.load("u1"), vec!["a".to_string()]);
        assert_eq!(cache.load("u2"), vec!["b".to_string()]);
    }

    #[test]
    fn test_stale_entry_cleared_on_read() {
        let storage = Arc::new(MemoryStore::new());
        let cache = cache_over(storage.clone());

        cache.save("u1", &["a".to_string()]);

        // Backdate the expiry marker past the freshness window
        let expired = (Utc::now() - Duration::days(2)).to_rfc3339();
        storage.set("accounts_u1_expiration", &expired);

        assert!(cache.load("u1").is_empty());
        assert_eq!(storage.get("accounts_u1"), None);
        assert_eq!(storage.get("accounts_u1_expiration"), None);
    }

    #[test]
    fn test_payload_without_expiry_is_empty() {
        let storage = Arc::new(MemoryStore::new());
        let cache = cache_over(storage.clone());

        storage.set("accounts_u1", "[\"a\"]");
        assert!(cache.load("u1").is_empty());
    }

    #[test]
    fn test_corrupt_payload_cleared_on_read() {
        let storage = Arc::new(MemoryStore::new());
        let cache = cache_over(storage.clone());

        cache.save("u1", &["a".to_string()]);
        storage.set("accounts_u1", "{broken");

        assert!(cache.load("u1").is_empty());
        assert_eq!(storage.get("accounts_u1"), None);
        assert_eq!(storage.get("accounts_u1_expiration"), None);
    }

    #[test]
    fn test_clear_removes_both_keys() {
        let storage = Arc::new(MemoryStore::new());
        let cache = cache_over(storage.clone());

        cache.save("u1", &["a".to_string()]);
        cache.clear("u1");
        assert!(storage.is_empty());
    }
}
