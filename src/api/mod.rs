//! Simplenote API client and types.
//!
//! This module provides the interface for communicating with the Simplenote
//! API: login, single-note operations and the paginated note index.

pub mod auth;
mod client;
pub mod error;
mod index;
#[cfg(test)]
mod mock;
pub mod transport;
pub mod types;

pub use auth::Credentials;
pub use client::SimplenoteClient;
pub use error::ApiError;
pub use index::{parse_since, NoteList, DEFAULT_PAGE_SIZE};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, RequestBody, Transport};
pub use types::{Note, NoteInput};
