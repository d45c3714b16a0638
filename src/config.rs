//! Application configuration management.
//!
//! Configuration is stored at `~/.config/argent-client/config.json` and can
//! be overridden through the environment (`ARGENT_API_URL`).
//!
//! The vault passphrase is environment-only (`ARGENT_VAULT_KEY`) and is
//! never written to the config file. There is no fallback value: a missing
//! passphrase is a startup error, not a silently weak key.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "argent-client";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Storage file name inside the data directory
const STORAGE_FILE: &str = "store.json";

/// Default API endpoint for local development
const DEFAULT_BASE_URL: &str = "http://localhost:3001/api/v1";

const ENV_BASE_URL: &str = "ARGENT_API_URL";
const ENV_VAULT_KEY: &str = "ARGENT_VAULT_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    /// Last identifier used to log in, for prefilling the form.
    pub last_email: Option<String>,
    #[serde(skip)]
    vault_passphrase: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            last_email: None,
            vault_passphrase: None,
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        config.vault_passphrase = std::env::var(ENV_VAULT_KEY).ok().filter(|v| !v.is_empty());

        Ok(config)
    }

    /// Persist the config file. The vault passphrase is never written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Key material for the credential vault.
    ///
    /// Errors when `ARGENT_VAULT_KEY` is unset or empty; the client refuses
    /// to encrypt remembered credentials under a well-known default.
    pub fn vault_passphrase(&self) -> Result<&str> {
        self.vault_passphrase
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("{} is not set; refusing to start without vault key material", ENV_VAULT_KEY))
    }

    /// Inject key material directly (embedders and tests).
    pub fn with_vault_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.vault_passphrase = Some(passphrase.into());
        self
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Location of the persistent key-value store.
    pub fn storage_path(&self) -> Result<PathBuf> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join(STORAGE_FILE))
    }
}
