//! HTTP transport used by the Simplenote client.
//!
//! The client never talks to `reqwest` directly. It builds an [`HttpRequest`]
//! and hands it to a [`Transport`], which reports either the HTTP status and
//! body or a connection-level failure. This keeps the auth and pagination
//! logic testable against an in-memory transport.

use std::future::Future;
use std::time::Duration;

use reqwest::{header, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::error::{ApiError, Result};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// A raw text body, sent as-is.
    Text(String),
    /// A JSON document.
    Json(serde_json::Value),
}

/// A request ready to be executed by a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Append query parameters.
    pub fn query<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = RequestBody::Text(body.into());
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Look up a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// The status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parse the body as JSON, failing on non-success statuses first.
    ///
    /// `context` names the resource for `NotFound` and server errors.
    pub fn json<T: DeserializeOwned>(&self, context: &str) -> Result<T> {
        if !self.is_success() {
            debug!("Error response body: {}", self.body);
            return Err(ApiError::from_status(self.status, context));
        }

        serde_json::from_str(&self.body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// Fail on non-success statuses and discard the body.
    pub fn ensure_success(&self, context: &str) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            debug!("Error response body: {}", self.body);
            Err(ApiError::from_status(self.status, context))
        }
    }
}

/// Performs HTTP exchanges for the client.
///
/// Implementations return `Ok` for every response that arrived, whatever its
/// status, and `Err(ApiError::Network)` when no response arrived at all.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

/// The `reqwest`-backed transport used outside of tests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .query(&request.query)
            .header(header::ACCEPT, "application/json");

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Text(text) => builder.body(text),
            RequestBody::Json(value) => builder.json(&value),
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), "Response received");

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_collects_query() {
        let request = HttpRequest::get("https://example.com/index")
            .query([("auth", "t0k"), ("email", "me@example.com")])
            .query([("length", "100".to_string())]);

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.query_param("auth"), Some("t0k"));
        assert_eq!(request.query_param("length"), Some("100"));
        assert_eq!(request.query_param("mark"), None);
        assert_eq!(request.body, RequestBody::Empty);
    }

    #[test]
    fn test_response_json_success() {
        let response = HttpResponse::new(StatusCode::OK, r#"{"key": "abc"}"#);
        let value: serde_json::Value = response.json("note abc").unwrap();
        assert_eq!(value["key"], "abc");
    }

    #[test]
    fn test_response_json_maps_status() {
        let response = HttpResponse::new(StatusCode::NOT_FOUND, "");
        let err = response.json::<serde_json::Value>("note abc").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref ctx) if ctx == "note abc"));
    }

    #[test]
    fn test_response_json_invalid_body() {
        let response = HttpResponse::new(StatusCode::OK, "<html>");
        let err = response.json::<serde_json::Value>("index").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_ensure_success() {
        assert!(HttpResponse::new(StatusCode::OK, "").ensure_success("x").is_ok());
        assert!(matches!(
            HttpResponse::new(StatusCode::FORBIDDEN, "").ensure_success("x"),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS)).is_ok());
    }
}
