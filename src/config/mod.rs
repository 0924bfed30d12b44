//! Configuration management for the Simplenote client.
//!
//! This module handles loading, saving, and validating the user's
//! configuration: the default account and the API endpoint settings.
//! Passwords are never written here; they live in the OS keyring.

mod account;
mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use account::Account;
pub use settings::ApiSettings;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "SIMPLENOTE_CONFIG";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine configuration directory")]
    NoConfigDir,

    #[error("failed to create configuration directory: {0}")]
    CreateDirError(#[source] std::io::Error),

    #[error("failed to read configuration file: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("failed to write configuration file: {0}")]
    WriteError(#[source] std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A value in the configuration is invalid.
    #[error("invalid configuration: {0}")]
    ValidationError(String),

    /// No account was given on the command line or in the config file.
    #[error("no account configured")]
    MissingAccount,
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The on-disk configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// The account used when none is given explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
    /// API endpoints and transport settings.
    #[serde(default)]
    pub api: ApiSettings,
}

impl Config {
    /// Load the configuration from its default location.
    ///
    /// A missing file yields the default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Load and validate the configuration at `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;

        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Save the configuration to its default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    /// Validate and write the configuration to `path`, creating parent
    /// directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(ConfigError::WriteError)?;

        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        if let Some(account) = &self.account {
            account.validate()?;
        }
        self.api.validate()
    }

    /// Pick the account to use: an explicit username wins over the
    /// configured default.
    pub fn resolve_account(&self, username: Option<&str>) -> Result<Account> {
        let account = match username {
            Some(name) => Account::new(name.to_string()),
            None => self.account.clone().ok_or(ConfigError::MissingAccount)?,
        };
        account.validate()?;
        Ok(account)
    }
}

/// Path of the configuration file.
///
/// `$SIMPLENOTE_CONFIG` if set, otherwise `simplenote/config.toml` under the
/// platform config directory.
pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("simplenote").join("config.toml"))
}
