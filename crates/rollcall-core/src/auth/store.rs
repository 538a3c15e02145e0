//! Persisted credential stores.
//!
//! A store holds at most one opaque token under the key `token`. The session
//! manager reads it at startup, writes it after a successful login and
//! deletes it on logout.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AuthError;

/// Key the token is stored under
pub const TOKEN_KEY: &str = "token";

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Keychain service name
const SERVICE_NAME: &str = "rollcall";

pub trait TokenStore: Send + Sync {
    /// Read the persisted token, `None` if nothing is stored.
    fn load(&self) -> Result<Option<String>, AuthError>;

    fn save(&self, token: &str) -> Result<(), AuthError>;

    /// Remove the persisted token. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), AuthError>;
}

// ============================================================================
// File store
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token kept as JSON in the cache directory.
pub struct FileTokenStore {
    cache_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, AuthError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).map_err(AuthError::store)?;

        // A file we cannot parse is still "something persisted": hand back the
        // raw contents so the manager rejects it as a corrupt token and clears it.
        match serde_json::from_str::<PersistedToken>(&contents) {
            Ok(persisted) => Ok(Some(persisted.token)),
            Err(e) => {
                debug!(error = %e, ?path, "Session file is not valid JSON");
                Ok(Some(contents))
            }
        }
    }

    fn save(&self, token: &str) -> Result<(), AuthError> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(AuthError::store)?;
        }
        let persisted = PersistedToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&persisted).map_err(AuthError::store)?;
        std::fs::write(path, contents).map_err(AuthError::store)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(path).map_err(AuthError::store)?;
        }
        Ok(())
    }
}

// ============================================================================
// Keyring store
// ============================================================================

/// Token kept in the OS keychain.
#[derive(Default)]
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    fn entry() -> Result<Entry, AuthError> {
        Entry::new(SERVICE_NAME, TOKEN_KEY).map_err(AuthError::store)
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<String>, AuthError> {
        match Self::entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AuthError::store(e)),
        }
    }

    fn save(&self, token: &str) -> Result<(), AuthError> {
        Self::entry()?.set_password(token).map_err(AuthError::store)
    }

    fn clear(&self) -> Result<(), AuthError> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(AuthError::store(e)),
        }
    }
}

// ============================================================================
// Memory store
// ============================================================================

/// In-process store. Clones share the same slot, so a test can keep a handle
/// and inspect what the manager persisted.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.to_string()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, AuthError> {
        let slot = self.slot.lock().map_err(AuthError::store)?;
        Ok(slot.clone())
    }

    fn save(&self, token: &str) -> Result<(), AuthError> {
        let mut slot = self.slot.lock().map_err(AuthError::store)?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        let mut slot = self.slot.lock().map_err(AuthError::store)?;
        *slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_save_load_clear() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested"));

        store.save("abc.def.ghi").unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load().unwrap().as_deref(), Some("abc.def.ghi"));

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load().unwrap(), None);

        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_garbage_returns_raw_contents() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());
        std::fs::write(store.path(), "garbage").unwrap();

        assert_eq!(store.load().unwrap().as_deref(), Some("garbage"));
    }

    #[test]
    fn test_memory_store_clones_share_slot() {
        let store = MemoryTokenStore::new();
        let handle = store.clone();

        store.save("t").unwrap();
        assert_eq!(handle.load().unwrap().as_deref(), Some("t"));

        handle.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_memory_store_with_token() {
        let store = MemoryTokenStore::with_token("x.y.z");
        assert_eq!(store.load().unwrap().as_deref(), Some("x.y.z"));
    }
}
