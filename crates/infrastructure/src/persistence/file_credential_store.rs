//! File-backed credential store.
//!
//! Tokens live in the platform data directory by default:
//! - Linux: ~/.local/share/rocket-reserver/credentials.json
//! - macOS: ~/Library/Application Support/rocket-reserver/credentials.json
//! - Windows: %APPDATA%/rocket-reserver/credentials.json

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rocket_application::{CredentialError, CredentialStore};
use rocket_domain::Token;
use serde::{Deserialize, Serialize};

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

const SCHEMA_VERSION: u32 = 1;

/// On-disk layout:
/// ```json
/// {
///   "schema_version": 1,
///   "slots": {
///     "login": { "token": "...", "saved_at": "2024-01-01T00:00:00Z" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialFile {
    schema_version: u32,
    #[serde(default)]
    slots: BTreeMap<String, StoredToken>,
}

impl Default for CredentialFile {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            slots: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Credential store persisted as a JSON file.
///
/// The file is read once on open and rewritten atomically on every change,
/// so lookups never touch the disk.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    state: Mutex<CredentialFile>,
}

impl FileCredentialStore {
    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CredentialError> {
        let path = path.into();
        let state = if path.exists() {
            let bytes = fs::read(&path)?;
            let file: CredentialFile = from_json_bytes(&bytes)
                .map_err(|e| CredentialError::Serialization(e.to_string()))?;
            if file.schema_version > SCHEMA_VERSION {
                return Err(CredentialError::Serialization(format!(
                    "unsupported schema version {}",
                    file.schema_version
                )));
            }
            file
        } else {
            CredentialFile::default()
        };

        tracing::debug!(path = %path.display(), slots = state.slots.len(), "credential store opened");
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Returns the default credentials file location.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("rocket-reserver").join("credentials.json"))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the token under `key` was stored.
    #[must_use]
    pub fn saved_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.state.lock().slots.get(key).map(|slot| slot.saved_at)
    }

    /// Applies `change` to a copy of the state, writes it, then commits it.
    fn update<T>(
        &self,
        change: impl FnOnce(&mut CredentialFile) -> T,
    ) -> Result<T, CredentialError> {
        let mut state = self.state.lock();
        let mut next = state.clone();
        let outcome = change(&mut next);
        self.write(&next)?;
        *state = next;
        Ok(outcome)
    }

    fn write(&self, file: &CredentialFile) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            to_json_stable_bytes(file).map_err(|e| CredentialError::Serialization(e.to_string()))?;

        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, content)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Option<Token> {
        self.state
            .lock()
            .slots
            .get(key)
            .map(|slot| Token::new(slot.token.clone()))
    }

    fn set(&self, key: &str, token: Token) -> Result<(), CredentialError> {
        self.update(|file| {
            file.slots.insert(
                key.to_string(),
                StoredToken {
                    token: token.expose().to_string(),
                    saved_at: Utc::now(),
                },
            );
        })?;
        tracing::debug!(key, "token saved");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<Option<Token>, CredentialError> {
        if !self.state.lock().slots.contains_key(key) {
            return Ok(None);
        }
        let removed = self.update(|file| file.slots.remove(key))?;
        tracing::debug!(key, "token removed");
        Ok(removed.map(|slot| Token::new(slot.token)))
    }
}
