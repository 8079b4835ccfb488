//! Typed API account configuration loading.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daily request limit assumed for keys supplied via environment variables.
pub const DEFAULT_DAILY_LIMIT: u32 = 50;

/// Errors that can occur while loading account configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid account '{name}': {reason}")]
    InvalidAccount { name: String, reason: String },

    #[error(
        "No API accounts configured.\n  Create {0} (run with --init-config for a template)\n  or set SLIDECAST_API_KEY_1 .. SLIDECAST_API_KEY_9 in the environment."
    )]
    NoAccounts(PathBuf),
}

/// One configured API account. All fields are required in config files;
/// a zero or missing daily_limit is a load-time error, never a silent default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub name: String,
    pub api_key: String,
    pub daily_limit: u32,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    accounts: Vec<AccountConfig>,
}

/// Validated set of API accounts.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub accounts: Vec<AccountConfig>,
}

impl ApiConfig {
    /// Load and validate accounts from a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let json = fs::read_to_string(path)?;
        let file: ConfigFile = serde_json::from_str(&json)?;

        let config = Self {
            accounts: file.accounts,
        };
        config.validate()?;

        Ok(config)
    }

    /// Load accounts from SLIDECAST_API_KEY_1..9, falling back to a single
    /// SLIDECAST_API_KEY. Keys from the environment get the default limit.
    pub fn from_env() -> Self {
        let mut accounts = Vec::new();

        for i in 1..10 {
            if let Ok(key) = env::var(format!("SLIDECAST_API_KEY_{i}"))
                && !key.trim().is_empty()
            {
                accounts.push(AccountConfig {
                    name: format!("Account {i} (env)"),
                    api_key: key,
                    daily_limit: DEFAULT_DAILY_LIMIT,
                });
            }
        }

        if accounts.is_empty()
            && let Ok(key) = env::var("SLIDECAST_API_KEY")
            && !key.trim().is_empty()
        {
            accounts.push(AccountConfig {
                name: "Account 1 (env)".to_string(),
                api_key: key,
                daily_limit: DEFAULT_DAILY_LIMIT,
            });
        }

        Self { accounts }
    }

    /// Resolve configuration: explicit path, else the default config file,
    /// else environment variables. No accounts anywhere is fatal.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default = Self::default_path();
        if default.exists() {
            return Self::load(&default);
        }

        let config = Self::from_env();
        if config.accounts.is_empty() {
            return Err(ConfigError::NoAccounts(default));
        }

        Ok(config)
    }

    /// Default config file location under the user's home directory.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".slidecast")
            .join("api_keys.json")
    }

    /// Write an example config file for the operator to fill in.
    pub fn write_example(path: &Path) -> Result<(), ConfigError> {
        let example = serde_json::json!({
            "accounts": [
                {
                    "name": "Account 1 (work)",
                    "api_key": "replace-with-your-key",
                    "daily_limit": 50
                },
                {
                    "name": "Account 2 (personal)",
                    "api_key": "replace-with-your-key",
                    "daily_limit": 50
                }
            ]
        });

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&example)?)?;

        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for acc in &self.accounts {
            if acc.name.trim().is_empty() {
                return Err(ConfigError::InvalidAccount {
                    name: "<unnamed>".to_string(),
                    reason: "name cannot be empty".to_string(),
                });
            }
            if acc.api_key.trim().is_empty() {
                return Err(ConfigError::InvalidAccount {
                    name: acc.name.clone(),
                    reason: "api_key cannot be empty".to_string(),
                });
            }
            if acc.daily_limit == 0 {
                return Err(ConfigError::InvalidAccount {
                    name: acc.name.clone(),
                    reason: "daily_limit must be positive".to_string(),
                });
            }
        }

        Ok(())
    }
}
