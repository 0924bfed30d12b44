//! Paginated retrieval of the note index.
//!
//! The index endpoint returns note summaries (everything but `content`) a
//! page at a time. Each page after the first is requested with the mark the
//! previous page returned, so pages are fetched strictly in order until the
//! server stops sending a mark.

use std::collections::HashSet;

use chrono::{Local, NaiveDate, TimeZone};
use tracing::{debug, info, instrument, warn};

use super::client::SimplenoteClient;
use super::error::{ApiError, Result};
use super::transport::{HttpRequest, Transport};
use super::types::{IndexPage, Note};

/// Default number of notes requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// The assembled note index.
///
/// A listing that failed part-way still carries the notes fetched before the
/// failure; `error` records what went wrong.
#[derive(Debug, Default)]
pub struct NoteList {
    pub notes: Vec<Note>,
    pub error: Option<ApiError>,
}

impl NoteList {
    /// Whether every page was fetched.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Discard partial results, keeping only complete listings.
    pub fn into_result(self) -> Result<Vec<Note>> {
        match self.error {
            None => Ok(self.notes),
            Some(e) => Err(e),
        }
    }
}

/// Where the pagination loop stands.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mark {
    First,
    Next(String),
    Done,
}

impl Mark {
    fn from_page(mark: Option<String>) -> Self {
        match mark {
            Some(m) if !m.is_empty() => Mark::Next(m),
            _ => Mark::Done,
        }
    }
}

impl<T: Transport> SimplenoteClient<T> {
    /// Fetch the full note index.
    ///
    /// `since` is a `YYYY-MM-DD` date; only notes modified after local
    /// midnight of that day are listed. An absent or unparsable date lists
    /// everything. When `tags` is non-empty, only notes carrying at least one
    /// of them are returned. Trashed notes are included.
    ///
    /// # Errors
    ///
    /// Returns `Err` only when the login is rejected. Every other failure
    /// ends up in [`NoteList::error`].
    #[instrument(skip(self))]
    pub async fn get_note_list(&self, since: Option<&str>, tags: &[&str]) -> Result<NoteList> {
        let mut params = self.get_auth_params().await?;
        params.push(("length".to_string(), self.page_size.to_string()));

        match since.and_then(parse_since) {
            Some(timestamp) => params.push(("since".to_string(), timestamp.to_string())),
            None if since.is_some() => debug!("Ignoring unparsable since date"),
            None => {}
        }

        let mut list = NoteList::default();
        let mut mark = Mark::First;
        let mut pages = 0u32;

        while mark != Mark::Done {
            let mut request = HttpRequest::get(&self.index_url).query(params.iter().cloned());
            if let Mark::Next(m) = &mark {
                request = request.query([("mark", m.as_str())]);
            }

            pages += 1;
            match self.fetch_page(request).await {
                Ok(page) => {
                    debug!(page = pages, notes = page.data.len(), "Fetched index page");
                    list.notes.extend(page.data);
                    mark = Mark::from_page(page.mark);
                }
                Err(e) => {
                    warn!(page = pages, "Index page failed, returning partial list: {}", e);
                    list.error = Some(e);
                    mark = Mark::Done;
                }
            }
        }

        if !tags.is_empty() {
            let wanted: HashSet<&str> = tags.iter().copied().collect();
            list.notes.retain(|n| n.has_any_tag(&wanted));
        }

        info!(pages, notes = list.notes.len(), complete = list.is_complete(), "Note index fetched");
        Ok(list)
    }

    async fn fetch_page(&self, request: HttpRequest) -> Result<IndexPage> {
        let response = self.transport().execute(request).await?;
        response.json("note index")
    }
}

/// Convert a `YYYY-MM-DD` date to the epoch seconds of its local midnight.
pub fn parse_since(date: &str) -> Option<i64> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let midnight = day.and_hms_opt(0, 0, 0)?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::Credentials;
    use crate::api::mock::MockTransport;
    use crate::config::ApiSettings;
    use reqwest::StatusCode;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    const INDEX_URL: &str = "https://app.simplenote.com/api2/index";

    fn client(transport: MockTransport) -> SimplenoteClient<MockTransport> {
        SimplenoteClient::with_transport(
            Credentials::new("user@example.com", "pw"),
            &ApiSettings::default(),
            transport,
        )
    }

    fn logged_in() -> MockTransport {
        MockTransport::new().respond(StatusCode::OK, "TOKEN")
    }

    fn keys(list: &NoteList) -> Vec<&str> {
        list.notes.iter().filter_map(|n| n.key.as_deref()).collect()
    }

    #[tokio::test]
    async fn test_pages_are_accumulated_in_order() {
        let client = client(
            logged_in()
                .respond_json(json!({"data": [{"key": "A"}, {"key": "B"}], "mark": "m1"}))
                .respond_json(json!({"data": [{"key": "C"}], "mark": ""})),
        );

        let list = assert_ok!(client.get_note_list(None, &[]).await);
        assert!(list.is_complete());
        assert_eq!(keys(&list), vec!["A", "B", "C"]);

        let pages = client.transport().requests_to(INDEX_URL);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].query_param("mark"), None);
        assert_eq!(pages[1].query_param("mark"), Some("m1"));
        assert_eq!(pages[0].query_param("length"), Some("100"));
        assert_eq!(pages[1].query_param("auth"), Some("TOKEN"));
    }

    #[tokio::test]
    async fn test_missing_mark_ends_listing() {
        let client = client(logged_in().respond_json(json!({"data": [{"key": "A"}]})));

        let list = assert_ok!(client.get_note_list(None, &[]).await);
        assert_eq!(keys(&list), vec!["A"]);
        assert_eq!(client.transport().requests_to(INDEX_URL).len(), 1);
    }

    #[tokio::test]
    async fn test_failed_page_keeps_partial_results() {
        let client = client(
            logged_in()
                .respond_json(json!({"data": [{"key": "A"}, {"key": "B"}], "mark": "m1"}))
                .fail("connection reset"),
        );

        let list = assert_ok!(client.get_note_list(None, &[]).await);
        assert!(!list.is_complete());
        assert_eq!(keys(&list), vec!["A", "B"]);
        assert!(list.error.as_ref().unwrap().is_connectivity());
        assert_eq!(client.transport().requests_to(INDEX_URL).len(), 2);
    }

    #[tokio::test]
    async fn test_failed_first_page_returns_empty_list() {
        let client = client(logged_in().fail("dns failure"));

        let list = assert_ok!(client.get_note_list(None, &[]).await);
        assert!(list.notes.is_empty());
        assert_err!(list.into_result());
    }

    #[tokio::test]
    async fn test_error_status_ends_listing() {
        let client = client(logged_in().respond(StatusCode::SERVICE_UNAVAILABLE, ""));

        let list = assert_ok!(client.get_note_list(None, &[]).await);
        assert!(matches!(list.error, Some(ApiError::ServerError(_))));
    }

    #[tokio::test]
    async fn test_tag_filter_after_all_pages() {
        let client = client(
            logged_in()
                .respond_json(json!({"data": [{"key": "X", "tags": ["x"]}, {"key": "Y", "tags": ["y"]}], "mark": "m1"}))
                .respond_json(json!({"data": [{"key": "E", "tags": []}, {"key": "X2", "tags": ["x", "y"], "deleted": 1}]})),
        );

        let list = assert_ok!(client.get_note_list(None, &["x"]).await);
        assert_eq!(keys(&list), vec!["X", "X2"]);
        assert!(list.notes[1].is_deleted());
    }

    #[tokio::test]
    async fn test_empty_tag_filter_returns_everything() {
        let client = client(logged_in().respond_json(json!({
            "data": [{"key": "X", "tags": ["x"]}, {"key": "Y", "tags": ["y"]}, {"key": "E", "tags": []}]
        })));

        let list = assert_ok!(client.get_note_list(None, &[]).await);
        assert_eq!(keys(&list), vec!["X", "Y", "E"]);
    }

    #[tokio::test]
    async fn test_since_is_sent_as_timestamp() {
        let client = client(logged_in().respond_json(json!({"data": []})));

        assert_ok!(client.get_note_list(Some("2021-01-05"), &[]).await);
        let expected = parse_since("2021-01-05").unwrap().to_string();
        let pages = client.transport().requests_to(INDEX_URL);
        assert_eq!(pages[0].query_param("since"), Some(expected.as_str()));
    }

    #[tokio::test]
    async fn test_invalid_since_is_omitted() {
        let client = client(logged_in().respond_json(json!({"data": []})));

        let list = assert_ok!(client.get_note_list(Some("yesterday"), &[]).await);
        assert!(list.is_complete());
        let pages = client.transport().requests_to(INDEX_URL);
        assert_eq!(pages[0].query_param("since"), None);
    }

    #[tokio::test]
    async fn test_rejected_login_is_an_error() {
        let client = client(MockTransport::new().respond(StatusCode::UNAUTHORIZED, ""));

        let err = assert_err!(client.get_note_list(None, &[]).await);
        assert!(matches!(err, ApiError::AuthenticationFailed(401)));
        assert!(client.transport().requests_to(INDEX_URL).is_empty());
    }

    #[tokio::test]
    async fn test_configured_page_size() {
        let settings = ApiSettings {
            page_size: 20,
            ..ApiSettings::default()
        };
        let client = SimplenoteClient::with_transport(
            Credentials::new("user@example.com", "pw"),
            &settings,
            logged_in().respond_json(json!({"data": []})),
        );

        assert_ok!(client.get_note_list(None, &[]).await);
        let pages = client.transport().requests_to(INDEX_URL);
        assert_eq!(pages[0].query_param("length"), Some("20"));
    }

    #[test]
    fn test_parse_since() {
        let first = parse_since("2021-01-05").unwrap();
        let second = parse_since("2021-01-06").unwrap();
        assert_eq!(second - first, 86_400);
    }

    #[test]
    fn test_parse_since_rejects_garbage() {
        assert_eq!(parse_since("2021-13-01"), None);
        assert_eq!(parse_since("05/01/2021"), None);
        assert_eq!(parse_since(""), None);
    }

    #[test]
    fn test_mark_from_page() {
        assert_eq!(Mark::from_page(Some("abc".to_string())), Mark::Next("abc".to_string()));
        assert_eq!(Mark::from_page(Some(String::new())), Mark::Done);
        assert_eq!(Mark::from_page(None), Mark::Done);
    }

    #[test]
    fn test_into_result() {
        let list = NoteList {
            notes: vec![Note::new("a")],
            error: None,
        };
        assert_eq!(list.into_result().unwrap().len(), 1);
    }
}
