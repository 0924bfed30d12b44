//! Client library for the Simplenote note-taking service.
//!
//! ```no_run
//! use simplenote::SimplenoteClient;
//!
//! # async fn run() -> Result<(), simplenote::ApiError> {
//! let client = SimplenoteClient::new("me@example.com", "secret")?;
//!
//! let note = client.add_note("Shopping list").await?;
//! let listing = client.get_note_list(Some("2024-01-01"), &["work"]).await?;
//! if !listing.is_complete() {
//!     eprintln!("listing is partial: {:?}", listing.error);
//! }
//! # let _ = note;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use api::{ApiError, Credentials, Note, NoteInput, NoteList, SimplenoteClient};
