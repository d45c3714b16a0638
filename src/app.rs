//! Client orchestration.
//!
//! `App` owns the gateway, the session, and the resource controllers, and
//! wires the session event channel between them. UI-originated intents
//! (login, fetch accounts, edit a transaction, logout) enter here; the
//! heavy lifting lives in the controllers.
//!
//! The logout cascade runs synchronously in a single call: token record,
//! accounts cache, profile, transaction state, and the transport token are
//! all cleared before `logout` returns, so no caller ever observes a
//! half-cleared session.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::{ApiClient, ErrorKind, Gateway};
use crate::auth::{RememberedCredentials, SessionController, SessionEvent};
use crate::config::Config;
use crate::models::{ProfilePatch, TransactionPatch};
use crate::resources::{AccountsController, ProfileController, TransactionsController};
use crate::store::{FileStore, SharedStorage};
use crate::vault::SecureVault;

pub struct App<G: Gateway = ApiClient> {
    config: Config,
    gateway: G,
    session: SessionController,
    profile: ProfileController,
    accounts: AccountsController,
    transactions: TransactionsController,
    events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl App<ApiClient> {
    /// Build an app with file-backed storage and the HTTP gateway.
    pub fn new(config: Config) -> Result<Self> {
        let storage: SharedStorage = Arc::new(FileStore::open(config.storage_path()?)?);
        let gateway = ApiClient::new(config.base_url.clone())?;
        Self::with_parts(config, storage, gateway)
    }
}

impl<G: Gateway> App<G> {
    /// Build an app from explicit parts (tests and embedders).
    ///
    /// Fails when the config carries no vault key material: there is no
    /// fallback encryption key.
    pub fn with_parts(config: Config, storage: SharedStorage, gateway: G) -> Result<Self> {
        let vault = SecureVault::new(storage.clone(), config.vault_passphrase()?)?;
        let credentials = RememberedCredentials::new(vault);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            gateway,
            session: SessionController::new(storage.clone(), credentials),
            profile: ProfileController::new(events_tx),
            accounts: AccountsController::new(storage),
            transactions: TransactionsController::new(),
            events: events_rx,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn profile(&self) -> &ProfileController {
        &self.profile
    }

    pub fn accounts(&self) -> &AccountsController {
        &self.accounts
    }

    pub fn transactions(&self) -> &TransactionsController {
        &self.transactions
    }

    /// Adopt a persisted session at process start, pushing the token into
    /// the transport. Returns false when nothing usable was persisted.
    pub fn restore(&mut self) -> bool {
        if !self.session.restore_from_storage() {
            return false;
        }
        if let Some(token) = self.session.token().map(str::to_string) {
            self.gateway.set_token(&token);
        }
        true
    }

    /// Log in and arm the transport with the fresh token.
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<(), ErrorKind> {
        let token = self
            .session
            .login(&self.gateway, email, password, remember_me)
            .await?;
        self.gateway.set_token(&token);
        self.config.last_email = Some(email.to_string());
        Ok(())
    }

    /// Tear the whole session down: token record, accounts cache, profile,
    /// transaction state, and transport token, in one synchronous step.
    /// Remembered credentials survive.
    pub fn logout(&mut self) {
        self.session.logout();
        self.accounts.clear();
        self.profile.reset();
        self.transactions.reset();
        self.gateway.clear_token();
        info!("Logout cascade complete");
    }

    /// Fetch the profile. Success confirms the session; an Unauthorized
    /// failure (escalated by the controller over the event channel) tears
    /// it down before this returns.
    pub async fn fetch_profile(&mut self) -> bool {
        let applied = self.profile.fetch(&self.gateway).await;
        if applied {
            self.session.mark_authenticated();
        }
        self.process_session_events();
        applied
    }

    pub async fn update_profile(&mut self, patch: &ProfilePatch) -> bool {
        self.profile.update(&self.gateway, patch).await
    }

    /// Serve accounts from the timed cache when fresh data is available.
    pub fn load_cached_accounts(&mut self, user_id: &str) -> bool {
        self.accounts.load_cached(user_id)
    }

    pub async fn fetch_accounts(&mut self, user_id: &str) -> bool {
        self.accounts.fetch(&self.gateway, user_id).await
    }

    pub async fn fetch_transactions(&mut self, account_id: &str) -> bool {
        self.transactions.fetch(&self.gateway, account_id).await
    }

    pub async fn fetch_transaction(&mut self, transaction_id: &str) -> bool {
        self.transactions
            .fetch_detail(&self.gateway, transaction_id)
            .await
    }

    pub async fn update_transaction(
        &mut self,
        account_id: &str,
        transaction_id: &str,
        patch: &TransactionPatch,
    ) -> bool {
        self.transactions
            .update(&self.gateway, account_id, transaction_id, patch)
            .await
    }

    pub async fn delete_transaction(&mut self, account_id: &str, transaction_id: &str) -> bool {
        self.transactions
            .delete(&self.gateway, account_id, transaction_id)
            .await
    }

    /// Drain pending session events. Returns true when an event forced a
    /// logout.
    pub fn process_session_events(&mut self) -> bool {
        let mut logged_out = false;
        while let Ok(event) = self.events.try_recv() {
            match event {
                SessionEvent::Unauthorized => {
                    warn!("Session rejected by remote service, logging out");
                    self.logout();
                    logged_out = true;
                }
            }
        }
        logged_out
    }
}
