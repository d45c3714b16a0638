//! Encrypted secret storage for remembered credentials.
//!
//! Secrets are encrypted with XChaCha20-Poly1305 under a key derived from the
//! configured passphrase via Argon2id, then persisted through the storage
//! port as `{ nonce, value, expiry }` records. Expiry is lazy: a stale record
//! is deleted the first time a read observes it.
//!
//! Retrieval never fails loudly. A missing, expired, corrupt, or
//! undecryptable record all read back as `None`; the worst case is that the
//! user has to type their credentials again.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::store::SharedStorage;

/// Application salt for deriving the vault key from the passphrase.
const KEY_SALT: &[u8] = b"argent-client-vault-v1";

/// Derived key length (256-bit).
const KEY_LEN: usize = 32;

/// Nonce length for XChaCha20-Poly1305.
const NONCE_LEN: usize = 24;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Vault key material is missing or empty")]
    MissingKeyMaterial,

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct VaultRecord {
    nonce: Vec<u8>,
    value: Vec<u8>,
    expiry: DateTime<Utc>,
}

/// Symmetric encrypt/decrypt of small secrets with per-record expiry.
pub struct SecureVault {
    storage: SharedStorage,
    cipher: XChaCha20Poly1305,
}

impl SecureVault {
    /// Build a vault over `storage` with key material derived from
    /// `passphrase`. An empty passphrase is rejected; there is no fallback
    /// key.
    pub fn new(storage: SharedStorage, passphrase: &str) -> Result<Self, VaultError> {
        if passphrase.is_empty() {
            return Err(VaultError::MissingKeyMaterial);
        }

        let mut key = [0u8; KEY_LEN];
        argon2::Argon2::default()
            .hash_password_into(passphrase.as_bytes(), KEY_SALT, &mut key)
            .map_err(|e| VaultError::KeyDerivation(e.to_string()))?;

        Ok(Self {
            storage,
            cipher: XChaCha20Poly1305::new(Key::from_slice(&key)),
        })
    }

    /// Encrypt `plaintext` and persist it under `key` with an expiry of
    /// `ttl_days` from now.
    pub fn store(&self, key: &str, plaintext: &str, ttl_days: i64) {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill(&mut nonce[..]);

        let value = match self
            .cipher
            .encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
        {
            Ok(ciphertext) => ciphertext,
            Err(e) => {
                warn!(key, error = %e, "Failed to encrypt secret, not storing");
                return;
            }
        };

        let record = VaultRecord {
            nonce: nonce.to_vec(),
            value,
            expiry: Utc::now() + Duration::days(ttl_days),
        };

        match serde_json::to_string(&record) {
            Ok(contents) => self.storage.set(key, &contents),
            Err(e) => warn!(key, error = %e, "Failed to serialize secret record"),
        }
    }

    /// Decrypt and return the secret stored under `key`.
    ///
    /// Expired records are deleted on read. Records that cannot be parsed or
    /// decrypted are deleted as well and read back as absent.
    pub fn retrieve(&self, key: &str) -> Option<String> {
        let contents = self.storage.get(key)?;

        let record: VaultRecord = match serde_json::from_str(&contents) {
            Ok(record) => record,
            Err(e) => {
                debug!(key, error = %e, "Corrupt secret record, removing");
                self.storage.remove(key);
                return None;
            }
        };

        if Utc::now() > record.expiry {
            debug!(key, "Secret record expired, removing");
            self.storage.remove(key);
            return None;
        }

        if record.nonce.len() != NONCE_LEN {
            debug!(key, "Secret record has invalid nonce, removing");
            self.storage.remove(key);
            return None;
        }

        let plaintext = match self
            .cipher
            .decrypt(XNonce::from_slice(&record.nonce), record.value.as_ref())
        {
            Ok(plaintext) => plaintext,
            Err(e) => {
                debug!(key, error = %e, "Failed to decrypt secret, removing");
                self.storage.remove(key);
                return None;
            }
        };

        match String::from_utf8(plaintext) {
            Ok(secret) => Some(secret),
            Err(e) => {
                debug!(key, error = %e, "Decrypted secret is not valid UTF-8, removing");
                self.storage.remove(key);
                None
            }
        }
    }

    /// Remove the secret stored under `key`, if any.
    pub fn remove(&self, key: &str) {
        self.storage.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{MemoryStore, StorageDriver};

    fn vault_over(storage: Arc<MemoryStore>) -> SecureVault {
        SecureVault::new(storage, "test-passphrase").expect("vault")
    }

    #[test]
    fn test_empty_passphrase_rejected() {
        let storage = Arc::new(MemoryStore::new());
        assert!(matches!(
            SecureVault::new(storage, ""),
            Err(VaultError::MissingKeyMaterial)
        ));
    }

    #[test]
    fn test_roundtrip() {
        let storage = Arc::new(MemoryStore::new());
        let vault = vault_over(storage.clone());

        vault.store("identifier", "a@b.com", 7);
        assert_eq!(vault.retrieve("identifier").as_deref(), Some("a@b.com"));

        // Ciphertext at rest, not plaintext
        let raw = storage.get("identifier").expect("record");
        assert!(!raw.contains("a@b.com"));
    }

    #[test]
    fn test_expired_record_removed_on_read() {
        let storage = Arc::new(MemoryStore::new());
        let vault = vault_over(storage.clone());

        vault.store("identifier", "a@b.com", 7);

        // Backdate the expiry marker directly in storage
        let raw = storage.get("identifier").expect("record");
        let mut record: VaultRecord = serde_json::from_str(&raw).expect("parse");
        record.expiry = Utc::now() - Duration::days(1);
        storage.set("identifier", &serde_json::to_string(&record).expect("json"));

        assert_eq!(vault.retrieve("identifier"), None);
        assert_eq!(storage.get("identifier"), None);
    }

    #[test]
    fn test_corrupt_record_reads_as_absent() {
        let storage = Arc::new(MemoryStore::new());
        let vault = vault_over(storage.clone());

        storage.set("identifier", "{definitely not a record");
        assert_eq!(vault.retrieve("identifier"), None);
        assert_eq!(storage.get("identifier"), None);
    }

    #[test]
    fn test_wrong_key_reads_as_absent() {
        let storage = Arc::new(MemoryStore::new());
        let vault = vault_over(storage.clone());
        vault.store("secret", "pw", 7);

        let other = SecureVault::new(storage.clone(), "other-passphrase").expect("vault");
        assert_eq!(other.retrieve("secret"), None);
        assert_eq!(storage.get("secret"), None);
    }

    #[test]
    fn test_remove() {
        let storage = Arc::new(MemoryStore::new());
        let vault = vault_over(storage);

        vault.store("identifier", "a@b.com", 7);
        vault.remove("identifier");
        assert_eq!(vault.retrieve("identifier"), None);
    }
}
