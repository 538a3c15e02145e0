//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the last email used to sign in, where the session token is
//! kept, and the simulated login latency.
//!
//! Configuration is stored at `~/.config/rollcall/config.json`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::{
    DemoVerifier, FileTokenStore, KeyringTokenStore, SessionManager, TokenStore,
};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "rollcall";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Simulated latency of a login round trip
const DEFAULT_LOGIN_DELAY_MS: u64 = 1000;

/// Where the session token is persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    /// `session.json` in the cache directory
    #[default]
    File,
    /// OS keychain
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub last_email: Option<String>,
    pub token_backend: TokenBackend,
    pub login_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            last_email: None,
            token_backend: TokenBackend::File,
            login_delay_ms: DEFAULT_LOGIN_DELAY_MS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            debug!(?path, "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Default location of the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    /// The token store selected by `token_backend`.
    pub fn token_store(&self) -> Result<Box<dyn TokenStore>> {
        Ok(match self.token_backend {
            TokenBackend::File => Box::new(FileTokenStore::new(self.cache_dir()?)),
            TokenBackend::Keyring => Box::new(KeyringTokenStore),
        })
    }

    /// A session manager wired to the demo verifier and the configured store.
    pub fn session_manager(&self) -> Result<SessionManager> {
        let verifier = DemoVerifier::default().with_delay(self.login_delay());
        Ok(SessionManager::new(Arc::new(verifier), self.token_store()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.last_email, None);
        assert_eq!(config.token_backend, TokenBackend::File);
        assert_eq!(config.login_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.login_delay_ms, DEFAULT_LOGIN_DELAY_MS);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"token_backend":"keyring"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.token_backend, TokenBackend::Keyring);
        assert_eq!(config.login_delay_ms, DEFAULT_LOGIN_DELAY_MS);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.json");
        let config = Config {
            last_email: Some("teacher@example.com".to_string()),
            token_backend: TokenBackend::File,
            login_delay_ms: 0,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.last_email.as_deref(), Some("teacher@example.com"));
        assert_eq!(loaded.login_delay_ms, 0);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
