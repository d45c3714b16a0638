use crate::vault::SecureVault;

/// Storage key for the remembered login identifier (email).
const IDENTIFIER_KEY: &str = "identifier";

/// Storage key for the remembered login secret (password).
const SECRET_KEY: &str = "secret";

/// Remembered credentials expire after 7 days.
const REMEMBER_TTL_DAYS: i64 = 7;

/// Encrypted remember-me storage.
///
/// Stores the login identifier and secret through the vault so a future
/// login form can be prefilled. Both fields are written together and a
/// prefill is only offered when both are still present and unexpired.
pub struct RememberedCredentials {
    vault: SecureVault,
}

impl RememberedCredentials {
    pub fn new(vault: SecureVault) -> Self {
        Self { vault }
    }

    /// Remember `identifier` and `secret` for the next 7 days.
    pub fn store(&self, identifier: &str, secret: &str) {
        self.vault.store(IDENTIFIER_KEY, identifier, REMEMBER_TTL_DAYS);
        self.vault.store(SECRET_KEY, secret, REMEMBER_TTL_DAYS);
    }

    /// The remembered identifier/secret pair, if both are still available.
    pub fn prefill(&self) -> Option<(String, String)> {
        let identifier = self.vault.retrieve(IDENTIFIER_KEY)?;
        let secret = self.vault.retrieve(SECRET_KEY)?;
        Some((identifier, secret))
    }

    /// The remembered identifier alone (for display on the login form even
    /// when the secret has already expired).
    pub fn identifier(&self) -> Option<String> {
        self.vault.retrieve(IDENTIFIER_KEY)
    }

    /// Forget both fields.
    pub fn clear(&self) {
        self.vault.remove(IDENTIFIER_KEY);
        self.vault.remove(SECRET_KEY);
    }
}
