//! Simplenote account configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};

/// A Simplenote account.
///
/// Only the login email is stored. The password is kept in the OS keyring
/// under the same name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// The login email address.
    pub username: String,
}

impl Account {
    pub fn new(username: String) -> Self {
        Self { username }
    }

    /// Validate this account.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` if the username is empty,
    /// contains whitespace, or is not an email address.
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(ConfigError::ValidationError(
                "username cannot be empty".to_string(),
            ));
        }

        if self.username.contains(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "username '{}' cannot contain whitespace",
                self.username
            )));
        }

        if !self.username.contains('@') {
            return Err(ConfigError::ValidationError(format!(
                "'{}' does not appear to be a valid email address",
                self.username
            )));
        }

        Ok(())
    }
}
