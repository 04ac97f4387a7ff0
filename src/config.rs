//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the security policy (lockout threshold, credential length
//! bounds) and an optional override for the users-file location.
//!
//! Configuration is stored at `~/.config/credkeep/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Application name used for config/data directory paths
const APP_NAME: &str = "credkeep";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Users snapshot file name
const USERS_FILE: &str = "users.json";

/// Security policy governing registration validation and lockout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SecurityPolicy {
    /// Failed logins before a username is locked for the rest of the run
    pub max_failed_attempts: u32,
    pub min_username_length: usize,
    pub max_username_length: usize,
    pub min_password_length: usize,
    pub max_password_length: usize,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: 3,
            min_username_length: 3,
            max_username_length: 30,
            min_password_length: 6,
            max_password_length: 100,
        }
    }
}

impl SecurityPolicy {
    /// Check cross-field coherence before the policy is put into service.
    pub fn validate(&self) -> Result<()> {
        if self.max_failed_attempts == 0 {
            anyhow::bail!("max_failed_attempts must be at least 1");
        }
        if self.min_username_length == 0 {
            anyhow::bail!("min_username_length must be at least 1");
        }
        if self.min_username_length > self.max_username_length {
            anyhow::bail!("min_username_length cannot exceed max_username_length");
        }
        if self.min_password_length > self.max_password_length {
            anyhow::bail!("min_password_length cannot exceed max_password_length");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub users_file: Option<PathBuf>,
    pub policy: SecurityPolicy,
}

impl Config {
    /// Load the config file, or fall back to defaults when it is absent.
    /// On first run the defaults are written out so the user has a file to
    /// edit.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            let config = Self::default();
            if let Err(e) = config.save() {
                debug!(error = %e, "Could not write default config file");
            }
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Location of the users snapshot: the configured override, or the
    /// platform data directory.
    pub fn users_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.users_file {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join(USERS_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_values() {
        let policy = SecurityPolicy::default();
        assert_eq!(policy.max_failed_attempts, 3);
        assert_eq!(policy.min_username_length, 3);
        assert_eq!(policy.min_password_length, 6);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_policy_rejects_zero_attempts() {
        let policy = SecurityPolicy {
            max_failed_attempts: 0,
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_policy_rejects_inverted_bounds() {
        let policy = SecurityPolicy {
            min_password_length: 20,
            max_password_length: 10,
            ..Default::default()
        };
        assert!(policy.validate().is_err());

        let policy = SecurityPolicy {
            min_username_length: 40,
            max_username_length: 30,
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "users_file": "/tmp/u.json" }"#).unwrap();
        assert_eq!(config.users_file, Some(PathBuf::from("/tmp/u.json")));
        assert_eq!(config.policy, SecurityPolicy::default());
    }

    #[test]
    fn test_users_path_override() {
        let config = Config {
            users_file: Some(PathBuf::from("/tmp/users.json")),
            ..Default::default()
        };
        assert_eq!(config.users_path().unwrap(), PathBuf::from("/tmp/users.json"));
    }
}
