use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::{ErrorKind, Gateway, Resource};
use crate::op::{OpStatus, OperationTracker};
use crate::store::SharedStorage;

use super::RememberedCredentials;

/// Cross-component escalation emitted by resource controllers and drained
/// by the session's owner. Carrying this over a channel (instead of calling
/// into the session from deep inside a resource operation) keeps ownership
/// directions acyclic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The remote service rejected the current token; the whole session
    /// must be torn down.
    Unauthorized,
}

/// Storage key for the persisted session token.
const TOKEN_KEY: &str = "token";

/// Token lifetime when the user asked to be remembered.
const TOKEN_TTL_REMEMBERED_DAYS: i64 = 30;

/// Token lifetime for a plain login.
const TOKEN_TTL_DEFAULT_DAYS: i64 = 1;

/// Persisted token record. The value and its expiry are one unit: they are
/// written together and removed together.
#[derive(Debug, Serialize, Deserialize)]
struct TokenRecord {
    value: String,
    expiry: DateTime<Utc>,
}

impl TokenRecord {
    fn is_expired(&self) -> bool {
        Utc::now() > self.expiry
    }
}

/// Owns the session token and the login/logout flow.
pub struct SessionController {
    storage: SharedStorage,
    credentials: RememberedCredentials,
    token: Option<String>,
    authenticated: bool,
    op: OperationTracker,
}

impl SessionController {
    pub fn new(storage: SharedStorage, credentials: RememberedCredentials) -> Self {
        Self {
            storage,
            credentials,
            token: None,
            authenticated: false,
            op: OperationTracker::new(),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn status(&self) -> OpStatus {
        self.op.status()
    }

    pub fn error(&self) -> Option<ErrorKind> {
        self.op.error()
    }

    /// Remembered identifier/secret for prefilling a login form.
    pub fn prefill(&self) -> Option<(String, String)> {
        self.credentials.prefill()
    }

    /// Authenticate against the remote service.
    ///
    /// On success the token is persisted with the expiry policy implied by
    /// `remember_me`, and the credentials are either remembered (encrypted,
    /// 7 days) or forgotten. On failure the classified error is returned and
    /// persisted token state is left untouched.
    pub async fn login<G: Gateway>(
        &mut self,
        gateway: &G,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<String, ErrorKind> {
        let ticket = self.op.begin();

        match gateway.login(email, password).await {
            Ok(token) => {
                if self.op.succeed(ticket) {
                    self.persist_token(&token, remember_me);
                    if remember_me {
                        self.credentials.store(email, password);
                    } else {
                        self.credentials.clear();
                    }
                    self.token = Some(token.clone());
                    self.authenticated = true;
                    info!(remember_me, "Login succeeded");
                }
                Ok(token)
            }
            Err(e) => {
                let kind = ErrorKind::from_api(Resource::Login, &e);
                debug!(error = %e, "Login failed");
                self.op.fail(ticket, kind);
                Err(kind)
            }
        }
    }

    /// Clear the token (memory and storage) and reset session state.
    ///
    /// Remembered credentials deliberately survive: remember-me persists
    /// independently of the session.
    pub fn logout(&mut self) {
        self.token = None;
        self.authenticated = false;
        self.storage.remove(TOKEN_KEY);
        self.op.reset();
        info!("Session cleared");
    }

    /// Adopt a previously persisted token, if one exists and is unexpired.
    ///
    /// An expired or unreadable record is removed on the spot, like any
    /// other lazily expired value.
    pub fn restore_from_storage(&mut self) -> bool {
        let Some(contents) = self.storage.get(TOKEN_KEY) else {
            return false;
        };

        let record: TokenRecord = match serde_json::from_str(&contents) {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "Corrupt token record, removing");
                self.storage.remove(TOKEN_KEY);
                return false;
            }
        };

        if record.is_expired() {
            debug!("Persisted token expired, removing");
            self.storage.remove(TOKEN_KEY);
            return false;
        }

        self.token = Some(record.value);
        self.authenticated = true;
        info!("Session restored from storage");
        true
    }

    /// Profile-fetch success confirms the session is live.
    pub fn mark_authenticated(&mut self) {
        self.authenticated = true;
    }

    fn persist_token(&self, token: &str, remember_me: bool) {
        let ttl_days = if remember_me {
            TOKEN_TTL_REMEMBERED_DAYS
        } else {
            TOKEN_TTL_DEFAULT_DAYS
        };
        let record = TokenRecord {
            value: token.to_string(),
            expiry: Utc::now() + Duration::days(ttl_days),
        };
        match serde_json::to_string(&record) {
            Ok(contents) => self.storage.set(TOKEN_KEY, &contents),
            Err(e) => debug!(error = %e, "Failed to serialize token record"),
        }
    }
}
