//! Simplenote API client implementation.
//!
//! This module provides the main client for the Simplenote API2 endpoints.
//! It handles authentication and single-note operations; the paginated
//! index lives in [`super::index`].

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use super::auth::{Auth, Credentials};
use super::error::{ApiError, Result};
use super::transport::{HttpRequest, HttpTransport, Transport};
use super::types::{Note, NoteInput};
use crate::config::ApiSettings;

/// The Simplenote API client.
///
/// Every operation runs its HTTP round-trips one after the other. Failures
/// come back as `Err`; only [`ApiError::AuthenticationFailed`] signals that
/// the credentials themselves were rejected.
#[derive(Debug)]
pub struct SimplenoteClient<T = HttpTransport> {
    /// The transport performing HTTP exchanges.
    transport: T,
    /// Credentials and the cached token.
    auth: Auth,
    pub(super) login_url: String,
    pub(super) data_url: String,
    pub(super) index_url: String,
    /// Number of notes requested per index page.
    pub(super) page_size: u32,
}

impl SimplenoteClient<HttpTransport> {
    /// Create a client against the public Simplenote service.
    pub fn new(username: &str, password: &str) -> Result<Self> {
        Self::from_settings(Credentials::new(username, password), &ApiSettings::default())
    }

    /// Create a client using configured endpoints and timeout.
    ///
    /// Does NOT log in; the token is fetched on the first request.
    #[instrument(skip_all, fields(email = %credentials.username()))]
    pub fn from_settings(credentials: Credentials, settings: &ApiSettings) -> Result<Self> {
        info!("Creating Simplenote client");
        let transport = HttpTransport::new(Duration::from_secs(settings.timeout_secs))?;
        Ok(Self::with_transport(credentials, settings, transport))
    }
}

impl<T: Transport> SimplenoteClient<T> {
    /// Create a client on top of an arbitrary transport.
    pub fn with_transport(credentials: Credentials, settings: &ApiSettings, transport: T) -> Self {
        Self {
            transport,
            auth: Auth::new(credentials),
            login_url: normalize_url(&settings.login_url),
            data_url: normalize_url(&settings.data_url),
            index_url: normalize_url(&settings.index_url),
            page_size: settings.page_size,
        }
    }

    /// The account email address.
    pub fn username(&self) -> &str {
        self.auth.username()
    }

    pub(super) fn transport(&self) -> &T {
        &self.transport
    }

    /// Return the session token, logging in if none is cached.
    ///
    /// `Ok(None)` means the login endpoint could not be reached.
    pub async fn get_token(&self) -> Result<Option<String>> {
        self.auth.token(&self.transport, &self.login_url).await
    }

    /// The `auth` and `email` query parameters for a data request.
    pub async fn get_auth_params(&self) -> Result<Vec<(String, String)>> {
        let token = self.get_token().await?;
        Ok(self.auth.auth_params(token))
    }

    /// Drop the cached token so the next request logs in again.
    pub async fn clear_token(&self) {
        self.auth.clear_token().await;
    }

    /// Fetch a note, optionally at a specific version.
    #[instrument(skip(self))]
    pub async fn get_note(&self, id: &str, version: Option<u64>) -> Result<Note> {
        debug!("Fetching note");

        let mut url = self.note_url(id);
        if let Some(version) = version {
            url = format!("{}/{}", url, version);
        }

        let request = HttpRequest::get(url).query(self.get_auth_params().await?);
        let response = self.transport.execute(request).await.map_err(|e| {
            warn!("Fetching note failed: {}", e);
            e
        })?;

        response.json(&format!("note {}", id))
    }

    /// Save a note. Notes without a key are created, others updated in place.
    ///
    /// An existing note without a `modifydate` is stamped with the current
    /// time before sending.
    #[instrument(skip(self, note), fields(key = ?note.key))]
    pub async fn update_note(&self, mut note: Note) -> Result<Note> {
        let url = match note.key.as_deref() {
            Some(key) => {
                if note.modifydate.is_none() {
                    note.modifydate = Some(now_timestamp());
                }
                self.note_url(key)
            }
            None => self.data_url.clone(),
        };
        debug!(url = %url, "Saving note");

        let body = serde_json::to_value(&note)
            .map_err(|e| ApiError::InvalidNote(format!("Failed to encode note: {}", e)))?;
        let request = HttpRequest::post(url)
            .query(self.get_auth_params().await?)
            .json(body);

        let response = self.transport.execute(request).await.map_err(|e| {
            warn!("Saving note failed: {}", e);
            e
        })?;

        let saved: Note = response.json(note.key.as_deref().unwrap_or("new note"))?;
        debug!(key = ?saved.key, "Note saved");
        Ok(saved)
    }

    /// Create a note from a bare body or from a note carrying `content`.
    pub async fn add_note(&self, note: impl Into<NoteInput>) -> Result<Note> {
        match note.into() {
            NoteInput::Content(content) => self.update_note(Note::new(content)).await,
            NoteInput::Note(note) if note.content.is_some() => self.update_note(note).await,
            NoteInput::Note(_) => Err(ApiError::InvalidNote(
                "No string or valid note.".to_string(),
            )),
        }
    }

    /// Move a note to the trash.
    #[instrument(skip(self))]
    pub async fn trash_note(&self, id: &str) -> Result<Note> {
        let mut note = self.get_note(id, None).await?;
        note.deleted = Some(true);
        self.update_note(note).await
    }

    /// Permanently delete a note.
    ///
    /// The API only deletes trashed notes, so the note is trashed first.
    #[instrument(skip(self))]
    pub async fn delete_note(&self, id: &str) -> Result<()> {
        self.trash_note(id).await?;

        let request = HttpRequest::delete(self.note_url(id)).query(self.get_auth_params().await?);
        let response = self.transport.execute(request).await.map_err(|e| {
            warn!("Deleting note failed: {}", e);
            e
        })?;
        response.ensure_success(&format!("note {}", id))?;

        info!("Note deleted");
        Ok(())
    }

    /// The per-note data URL.
    fn note_url(&self, id: &str) -> String {
        format!("{}/{}", self.data_url, urlencoding::encode(id))
    }
}

/// Current time in seconds since the epoch, with millisecond precision.
fn now_timestamp() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Remove trailing slashes and warn about plain HTTP.
fn normalize_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    // Warn if not HTTPS (but don't enforce for localhost/testing)
    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }

    url.to_string()
}
