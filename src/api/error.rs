//! API error types for the Simplenote client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when interacting with the Simplenote API.
///
/// Only [`ApiError::AuthenticationFailed`] is a hard failure: the login
/// endpoint rejected the credentials. Everything else is a soft failure that
/// callers are expected to inspect on the returned `Result`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The login endpoint rejected the credentials.
    #[error("Login to Simplenote API failed (HTTP {0})")]
    AuthenticationFailed(u16),

    /// A data request was rejected, usually because the token is stale.
    #[error("Unauthorized: the auth token was rejected")]
    Unauthorized,

    /// Permission denied - user lacks access to the resource.
    #[error("Permission denied: you don't have access to this resource")]
    Forbidden,

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limited by the Simplenote API.
    #[error("Rate limited: please wait before retrying")]
    RateLimited,

    /// Simplenote server error.
    #[error("Simplenote server error: {0}")]
    ServerError(String),

    /// Connection-level failure (DNS, timeout, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid response from the API.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// The note passed in cannot be sent.
    #[error("{0}")]
    InvalidNote(String),

    /// Keyring error when storing/retrieving passwords.
    #[error("Keyring error: {0}")]
    Keyring(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: StatusCode, context: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound(context.to_string()),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(format!("HTTP {}: {}", status, context)),
            _ => ApiError::ServerError(format!("Unexpected HTTP {}: {}", status, context)),
        }
    }

    /// Whether this error is a hard failure rather than a soft, returned one.
    pub fn is_hard(&self) -> bool {
        matches!(self, ApiError::AuthenticationFailed(_))
    }

    /// Whether the request never reached the server.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_status_401() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "test");
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn test_error_from_status_404() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, "note abc123");
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "note abc123"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_error_from_status_429() {
        let err = ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, "test");
        assert!(matches!(err, ApiError::RateLimited));
    }

    #[test]
    fn test_error_from_status_500() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "test");
        assert!(matches!(err, ApiError::ServerError(_)));
    }

    #[test]
    fn test_only_login_failure_is_hard() {
        assert!(ApiError::AuthenticationFailed(401).is_hard());
        assert!(!ApiError::Unauthorized.is_hard());
        assert!(!ApiError::Network("reset".to_string()).is_hard());
    }

    #[test]
    fn test_is_connectivity() {
        assert!(ApiError::Network("timed out".to_string()).is_connectivity());
        assert!(!ApiError::RateLimited.is_connectivity());
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::AuthenticationFailed(401);
        assert_eq!(err.to_string(), "Login to Simplenote API failed (HTTP 401)");

        let err = ApiError::InvalidNote("No string or valid note.".to_string());
        assert_eq!(err.to_string(), "No string or valid note.");
    }
}
