//! Centralized error types for the Simplenote tool.
//!
//! This module provides a unified error hierarchy for the command line front
//! end with user-friendly error messages.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;

/// The main application error type.
///
/// Aggregates configuration and API errors while preserving the underlying
/// error for logging.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file is readable."
                        .to_string()
                }
                ConfigError::WriteError(_) => {
                    "Could not save configuration. Please check file permissions.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
                ConfigError::MissingAccount => "No Simplenote account configured.".to_string(),
            },
            AppError::Api(e) => match e {
                ApiError::AuthenticationFailed(_) => {
                    "Login failed. Please check your email and password.".to_string()
                }
                ApiError::Unauthorized => {
                    "Simplenote rejected the session. Please log in again.".to_string()
                }
                ApiError::Forbidden => {
                    "Access denied. You don't have permission to access this note.".to_string()
                }
                ApiError::NotFound(resource) => format!("'{}' was not found.", resource),
                ApiError::RateLimited => {
                    "Too many requests. Please wait a moment and try again.".to_string()
                }
                ApiError::ServerError(_) => {
                    "Simplenote server error. Please try again later.".to_string()
                }
                ApiError::Network(_) => {
                    "Connection failed. Please check your internet connection.".to_string()
                }
                ApiError::InvalidResponse(_) => {
                    "Unexpected response from Simplenote. Please try again.".to_string()
                }
                ApiError::InvalidNote(msg) => msg.clone(),
                ApiError::Keyring(_) => {
                    "Could not access secure storage. Please run 'simplenote login'.".to_string()
                }
            },
            AppError::Io(_) => {
                "A file operation failed while writing output or reading files.".to_string()
            }
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Check if this error is critical, i.e. retrying without user action
    /// cannot succeed.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            AppError::Config(_)
                | AppError::Api(ApiError::AuthenticationFailed(_))
                | AppError::Api(ApiError::Keyring(_))
        )
    }

    /// Process exit status: 2 when the user has to fix something first,
    /// 1 for failures that may go away on their own.
    pub fn exit_code(&self) -> u8 {
        if self.is_critical() {
            2
        } else {
            1
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::MissingAccount) => {
                Some("Pass --user or run 'simplenote login --user EMAIL'.")
            }
            AppError::Config(ConfigError::ParseError(_))
            | AppError::Config(ConfigError::ValidationError(_)) => {
                Some("Fix the config file or point SIMPLENOTE_CONFIG elsewhere.")
            }
            AppError::Api(ApiError::AuthenticationFailed(_))
            | AppError::Api(ApiError::Keyring(_)) => {
                Some("Run 'simplenote login' to store your password again.")
            }
            AppError::Api(ApiError::RateLimited) => Some("Wait a few seconds and try again."),
            AppError::Api(ApiError::Network(_)) => Some("Check your internet connection."),
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::NoConfigDir.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::NoConfigDir)));
    }

    #[test]
    fn test_app_error_from_api_error() {
        let app_err: AppError = ApiError::AuthenticationFailed(401).into();
        assert!(matches!(
            app_err,
            AppError::Api(ApiError::AuthenticationFailed(401))
        ));
    }

    #[test]
    fn test_user_message_login_failed() {
        let msg = AppError::Api(ApiError::AuthenticationFailed(401)).user_message();
        assert!(msg.contains("Login failed"));
        assert!(msg.contains("password"));
    }

    #[test]
    fn test_user_message_not_found() {
        let err = AppError::Api(ApiError::NotFound("note k1".to_string()));
        let msg = err.user_message();
        assert!(msg.contains("note k1"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_user_message_invalid_note_passes_through() {
        let err = AppError::Api(ApiError::InvalidNote("No string or valid note.".to_string()));
        assert_eq!(err.user_message(), "No string or valid note.");
    }

    #[test]
    fn test_is_critical() {
        assert!(AppError::Config(ConfigError::MissingAccount).is_critical());
        assert!(AppError::Api(ApiError::AuthenticationFailed(403)).is_critical());
        assert!(!AppError::Api(ApiError::Network("reset".to_string())).is_critical());
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(AppError::Api(ApiError::AuthenticationFailed(401)).exit_code(), 2);
        assert_eq!(AppError::Config(ConfigError::MissingAccount).exit_code(), 2);
        assert_eq!(AppError::Api(ApiError::RateLimited).exit_code(), 1);
    }

    #[test]
    fn test_io_error_conversion() {
        let err: AppError = std::io::Error::from(std::io::ErrorKind::BrokenPipe).into();
        assert!(matches!(err, AppError::Io(_)));
        assert!(err.user_message().contains("file operation"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_suggested_action_missing_account() {
        let action = AppError::Config(ConfigError::MissingAccount).suggested_action();
        assert!(action.unwrap().contains("--user"));
    }

    #[test]
    fn test_other_error() {
        let err = AppError::other("something went wrong");
        assert!(matches!(err, AppError::Other(_)));
        assert_eq!(err.user_message(), "something went wrong");
        assert!(err.suggested_action().is_none());
    }
}
