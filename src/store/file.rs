use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::warn;

use super::StorageDriver;

/// File-backed storage driver.
///
/// All entries live in a single JSON object that is loaded once at
/// construction and rewritten on every mutation. Writes go to a temp file
/// followed by a rename, so a crash mid-write never leaves a torn store.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open (or create) the store at `path`.
    ///
    /// A missing file is an empty store. A corrupt file is replaced on the
    /// next write; its entries are treated as absent rather than fatal.
    pub fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create storage directory {:?}", parent))?;
        }

        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = ?path, error = %e, "Corrupt storage file, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &HashMap<String, String>) {
        if let Err(e) = self.try_flush(entries) {
            warn!(path = ?self.path, error = %e, "Failed to persist storage");
        }
    }

    fn try_flush(&self, entries: &HashMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, contents)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl StorageDriver for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("storage lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().expect("storage lock poisoned");
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().expect("storage lock poisoned");
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}
