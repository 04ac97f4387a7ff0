//! Persistent user record storage.
//!
//! All registered users live in a single JSON snapshot keyed by username:
//!
//! ```json
//! {
//!   "alice": { "password": "<hex digest>", "created_at": "2024-01-15T10:30:45Z" }
//! }
//! ```
//!
//! A missing file is the first-run case and loads as an empty store. A file
//! that exists but does not parse is treated as recoverable corruption: the
//! store loads empty and the condition is reported to the caller instead of
//! failing the process.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// In-memory image of the snapshot.
pub type UserMap = HashMap<String, UserRecord>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode user snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One registered identity, keyed by username in the snapshot.
/// Holds the password digest, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "password")]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(password_hash: String) -> Self {
        Self {
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Result of loading the snapshot. `recovered` is set when the file existed
/// but could not be parsed and the store was reset to empty.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub users: UserMap,
    pub recovered: bool,
}

pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the snapshot from disk.
    ///
    /// A missing file yields an empty store (first run). Unparseable content
    /// yields an empty store with `recovered` set. An unreadable file is a
    /// real I/O failure and propagates.
    pub fn load(&self) -> Result<Snapshot, StoreError> {
        if !self.path.exists() {
            return Ok(Snapshot::default());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&contents) {
            Ok(users) => Ok(Snapshot {
                users,
                recovered: false,
            }),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "User snapshot is corrupt, starting with an empty store"
                );
                Ok(Snapshot {
                    users: UserMap::new(),
                    recovered: true,
                })
            }
        }
    }

    /// Write the full snapshot, replacing whatever was there.
    ///
    /// The write goes to a sibling temp file first and is renamed into
    /// place, so a crash mid-write cannot leave a half-written snapshot.
    pub fn save(&self, users: &UserMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(users)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, CredentialStore) {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("users.json"));
        (dir, store)
    }

    #[test]
    fn test_load_missing_file_is_empty_not_recovered() {
        let (_dir, store) = test_store();
        let snapshot = store.load().unwrap();
        assert!(snapshot.users.is_empty());
        assert!(!snapshot.recovered);
    }

    #[test]
    fn test_save_load_round_trip() {
        let (_dir, store) = test_store();

        let mut users = UserMap::new();
        users.insert("alice".to_string(), UserRecord::new("ab12".repeat(16)));
        users.insert("bob".to_string(), UserRecord::new("cd34".repeat(16)));
        store.save(&users).unwrap();

        let snapshot = store.load().unwrap();
        assert!(!snapshot.recovered);
        assert_eq!(snapshot.users, users);

        // Saving what was loaded must not change subsequent loads
        store.save(&snapshot.users).unwrap();
        assert_eq!(store.load().unwrap().users, users);
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let (_dir, store) = test_store();

        let mut users = UserMap::new();
        users.insert("alice".to_string(), UserRecord::new("ab".repeat(32)));
        store.save(&users).unwrap();

        users.remove("alice");
        users.insert("carol".to_string(), UserRecord::new("ef".repeat(32)));
        store.save(&users).unwrap();

        let loaded = store.load().unwrap().users;
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key("carol"));
    }

    #[test]
    fn test_load_corrupt_file_recovers_empty() {
        let (_dir, store) = test_store();
        std::fs::write(store.path(), "{ not json at all").unwrap();

        let snapshot = store.load().unwrap();
        assert!(snapshot.users.is_empty());
        assert!(snapshot.recovered);
    }

    #[test]
    fn test_wire_format_field_names() {
        let (_dir, store) = test_store();
        let mut users = UserMap::new();
        users.insert("alice".to_string(), UserRecord::new("aa".repeat(32)));
        store.save(&users).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["alice"]["password"].is_string());
        assert!(value["alice"]["created_at"].is_string());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("nested").join("users.json"));
        store.save(&UserMap::new()).unwrap();
        assert!(store.path().exists());
    }
}
