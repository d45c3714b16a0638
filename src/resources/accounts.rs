use tracing::debug;

use crate::api::{ErrorKind, Gateway, Resource};
use crate::cache::TimedCache;
use crate::models::Account;
use crate::op::{OpStatus, OperationTracker};
use crate::store::SharedStorage;

/// Cache namespace for account collections.
const CACHE_NAME: &str = "accounts";

/// Controller for a user's bank accounts.
///
/// Successful fetches overwrite both the in-memory list and the timed
/// cache; a page reload within the freshness window can serve from the
/// cache without touching the network.
pub struct AccountsController {
    accounts: Vec<Account>,
    cache: TimedCache<Account>,
    /// Owner of the data currently held, so the logout cascade can clear
    /// the matching cache keys even when no profile is loaded.
    owner: Option<String>,
    op: OperationTracker,
}

impl AccountsController {
    pub fn new(storage: SharedStorage) -> Self {
        Self {
            accounts: Vec::new(),
            cache: TimedCache::new(storage, CACHE_NAME),
            owner: None,
            op: OperationTracker::new(),
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn status(&self) -> OpStatus {
        self.op.status()
    }

    pub fn error(&self) -> Option<ErrorKind> {
        self.op.error()
    }

    /// Serve `user_id`'s accounts from the cache, if fresh data is there.
    /// Returns true when the cache had something to offer.
    pub fn load_cached(&mut self, user_id: &str) -> bool {
        let items = self.cache.load(user_id);
        self.owner = Some(user_id.to_string());
        if items.is_empty() {
            return false;
        }
        debug!(user_id, count = items.len(), "Loaded accounts from cache");
        self.accounts = items;
        true
    }

    /// Fetch `user_id`'s accounts from the remote service. Success
    /// overwrites memory and cache; failure leaves whatever was already
    /// loaded in place.
    pub async fn fetch<G: Gateway>(&mut self, gateway: &G, user_id: &str) -> bool {
        let ticket = self.op.begin();

        match gateway.fetch_accounts(user_id).await {
            Ok(accounts) => {
                if !self.op.succeed(ticket) {
                    return false;
                }
                self.accounts = accounts;
                self.cache.save(user_id, &self.accounts);
                self.owner = Some(user_id.to_string());
                true
            }
            Err(e) => {
                let kind = ErrorKind::from_api(Resource::Accounts, &e);
                debug!(user_id, error = %e, "Accounts fetch failed");
                self.op.fail(ticket, kind);
                false
            }
        }
    }

    /// Drop in-memory accounts and the persisted cache (logout cascade).
    pub fn clear(&mut self) {
        if let Some(owner) = self.owner.take() {
            self.cache.clear(&owner);
        }
        self.accounts.clear();
        self.op.reset();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::gateway::mock::{sample_account, MockGateway};
    use crate::store::{MemoryStore, StorageDriver};

    #[tokio::test]
    async fn test_fetch_populates_memory_and_cache() {
        let storage = Arc::new(MemoryStore::new());
        let mut accounts = AccountsController::new(storage.clone());
        let gateway = MockGateway {
            accounts: vec![sample_account("x8349"), sample_account("x6712")],
            ..Default::default()
        };

        assert!(accounts.fetch(&gateway, "u1").await);
        assert_eq!(accounts.accounts().len(), 2);
        assert_eq!(accounts.status(), OpStatus::Succeeded);
        assert!(storage.get("accounts_u1").is_some());
        assert!(storage.get("accounts_u1_expiration").is_some());
    }

    #[tokio::test]
    async fn test_cached_accounts_served_without_network() {
        let storage = Arc::new(MemoryStore::new());
        let gateway = MockGateway {
            accounts: vec![sample_account("x8349")],
            ..Default::default()
        };

        {
            let mut accounts = AccountsController::new(storage.clone());
            accounts.fetch(&gateway, "u1").await;
        }

        // Fresh process an hour later: the cache is still warm
        let mut accounts = AccountsController::new(storage);
        assert!(accounts.load_cached("u1"));
        assert_eq!(accounts.accounts().len(), 1);
        assert_eq!(gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_stale_data() {
        let storage = Arc::new(MemoryStore::new());
        let mut accounts = AccountsController::new(storage);
        let ok_gateway = MockGateway {
            accounts: vec![sample_account("x8349")],
            ..Default::default()
        };
        accounts.fetch(&ok_gateway, "u1").await;

        let bad_gateway = MockGateway {
            fail_status: Some(500),
            ..Default::default()
        };
        assert!(!accounts.fetch(&bad_gateway, "u1").await);

        assert_eq!(accounts.accounts().len(), 1);
        assert_eq!(
            accounts.error(),
            Some(ErrorKind::OperationFailed(Resource::Accounts))
        );
    }

    #[tokio::test]
    async fn test_clear_removes_cache_keys() {
        let storage = Arc::new(MemoryStore::new());
        let mut accounts = AccountsController::new(storage.clone());
        let gateway = MockGateway {
            accounts: vec![sample_account("x8349")],
            ..Default::default()
        };
        accounts.fetch(&gateway, "u1").await;

        accounts.clear();
        assert!(accounts.accounts().is_empty());
        assert_eq!(accounts.status(), OpStatus::Idle);
        assert_eq!(storage.get("accounts_u1"), None);
        assert_eq!(storage.get("accounts_u1_expiration"), None);
    }

    #[tokio::test]
    async fn test_unauthorized_classification() {
        let storage = Arc::new(MemoryStore::new());
        let mut accounts = AccountsController::new(storage);
        let gateway = MockGateway {
            fail_status: Some(401),
            ..Default::default()
        };

        assert!(!accounts.fetch(&gateway, "u1").await);
        assert_eq!(accounts.error(), Some(ErrorKind::Unauthorized));
    }
}
