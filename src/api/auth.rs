//! Authentication handling for the Simplenote API.
//!
//! Simplenote logs in with a Base64-encoded form body and answers with a
//! bearer token. The token is fetched lazily on first use, cached for the
//! lifetime of the client and never refreshed on its own. Passwords can be
//! kept in the OS keyring between runs.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::error::{ApiError, Result};
use super::transport::{HttpRequest, Transport};

/// The keyring service name for Simplenote passwords.
const KEYRING_SERVICE: &str = "simplenote";

/// Login credentials. Immutable once the client is built.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Load the password for `username` from the OS keyring.
    ///
    /// # Errors
    ///
    /// Returns an error if the password cannot be retrieved from the keyring.
    pub fn from_keyring(username: &str) -> Result<Self> {
        let password = get_password(username)?;
        Ok(Self::new(username, &password))
    }

    /// The account email address.
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Credentials plus the cached session token.
pub struct Auth {
    credentials: Credentials,
    token: Mutex<Option<String>>,
}

impl Auth {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            token: Mutex::new(None),
        }
    }

    /// Get the email address.
    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    /// Exchange the credentials for a token.
    ///
    /// A rejected login is an error. A login that never reached the server
    /// yields `Ok(None)` so callers degrade to unauthenticated requests.
    #[instrument(skip(self, transport), fields(email = %self.username()))]
    pub async fn authenticate<T: Transport>(
        &self,
        transport: &T,
        login_url: &str,
    ) -> Result<Option<String>> {
        debug!("Requesting auth token");

        let request = HttpRequest::post(login_url).text(login_body(
            &self.credentials.username,
            &self.credentials.password,
        ));

        let response = match transport.execute(request).await {
            Ok(response) => response,
            Err(ApiError::Network(e)) => {
                warn!("Login request failed, continuing without a token: {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if !response.is_success() {
            warn!(status = response.status.as_u16(), "Login rejected");
            return Err(ApiError::AuthenticationFailed(response.status.as_u16()));
        }

        let token = response.body.trim();
        if token.is_empty() {
            warn!("Login returned an empty token");
            return Ok(None);
        }

        info!("Authenticated");
        Ok(Some(token.to_string()))
    }

    /// Return the cached token, logging in first if there is none.
    ///
    /// An unsuccessful login is not cached, so the next call tries again.
    pub async fn token<T: Transport>(
        &self,
        transport: &T,
        login_url: &str,
    ) -> Result<Option<String>> {
        let mut cached = self.token.lock().await;
        if cached.is_none() {
            *cached = self.authenticate(transport, login_url).await?;
        }
        Ok(cached.clone())
    }

    /// Forget the cached token. The next request logs in again.
    pub async fn clear_token(&self) {
        *self.token.lock().await = None;
    }

    /// Query parameters that authenticate a data request.
    pub fn auth_params(&self, token: Option<String>) -> Vec<(String, String)> {
        vec![
            ("auth".to_string(), token.unwrap_or_default()),
            ("email".to_string(), self.username().to_string()),
        ]
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Build the login request body.
///
/// Encodes "email=...&password=..." in Base64. Values are sent verbatim.
fn login_body(email: &str, password: &str) -> String {
    let form = format!("email={}&password={}", email, password);
    BASE64.encode(form.as_bytes())
}

/// Store a password in the OS keyring.
///
/// # Errors
///
/// Returns an error if the password cannot be stored in the keyring.
pub fn store_password(username: &str, password: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, username)
        .map_err(|e| ApiError::Keyring(format!("failed to create keyring entry: {}", e)))?;

    entry
        .set_password(password)
        .map_err(|e| ApiError::Keyring(format!("failed to store password: {}", e)))?;

    Ok(())
}

/// Retrieve a password from the OS keyring.
///
/// # Errors
///
/// Returns an error if the password cannot be retrieved from the keyring.
pub fn get_password(username: &str) -> Result<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, username)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .get_password()
        .map_err(|e| ApiError::Keyring(format!("failed to retrieve password: {}", e)))
}

/// Delete a password from the OS keyring.
pub fn delete_password(username: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, username)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .delete_password()
        .map_err(|e| ApiError::Keyring(format!("failed to delete password: {}", e)))?;

    Ok(())
}
