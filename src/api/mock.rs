//! In-memory transport for tests.
//!
//! Responses are queued up front and handed out in order; every request is
//! recorded so tests can assert on URLs, query parameters and bodies.

use std::collections::VecDeque;
use std::sync::Mutex;

use reqwest::StatusCode;
use serde_json::Value;

use super::error::{ApiError, Result};
use super::transport::{HttpRequest, HttpResponse, Transport};

#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with a raw body.
    pub fn respond(self, status: StatusCode, body: &str) -> Self {
        self.push(Ok(HttpResponse::new(status, body)))
    }

    /// Queue a 200 response with a JSON body.
    pub fn respond_json(self, body: Value) -> Self {
        self.respond(StatusCode::OK, &body.to_string())
    }

    /// Queue a connection-level failure.
    pub fn fail(self, reason: &str) -> Self {
        self.push(Err(ApiError::Network(reason.to_string())))
    }

    fn push(self, response: Result<HttpResponse>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose URL equals `url`.
    pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url == url)
            .collect()
    }
}

impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no response queued for {} {}", request.method, request.url))
    }
}
