//! The HTTP collaborator the pagination engine talks to.
//!
//! A pager only needs one operation from the outside world: GET an absolute
//! URL and hand back the decoded JSON body. That seam is the [`Transport`]
//! trait; [`HttpTransport`] is the production implementation over any
//! [`HttpClient`] backend, carrying the bearer token and mapping the
//! service's error envelope onto [`TuneError`].

use crate::{Result, TuneError};
use async_trait::async_trait;
use http_client::{HttpClient, Request};
use http_types::{Method, Url};
use serde_json::Value;
use std::sync::Arc;

/// Fetch collaborator used by pagers to follow next-page URLs.
///
/// Implementations perform a GET against an absolute URL and return the
/// decoded JSON body. Pagers never interpret status codes themselves; a
/// transport failure of any kind surfaces as an error from the fetch.
/// Timeout and cancellation policy belong entirely to the implementation.
///
/// # Mocking Support
///
/// When the `mock` feature is enabled, this crate provides `MockTransport`
/// implementing this trait via the `mockall` library.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait Transport {
    /// GET `url` and decode the response body as JSON.
    async fn fetch(&self, url: &str) -> Result<Value>;
}

/// Production [`Transport`] over an [`HttpClient`] backend.
///
/// Cloning is cheap; clones share the underlying HTTP client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<dyn HttpClient + Send + Sync>,
    token: String,
}

impl HttpTransport {
    /// Create a transport that authenticates every request with `token`.
    ///
    /// # Arguments
    ///
    /// * `client` - Any HTTP client implementation that implements [`HttpClient`]
    /// * `token` - OAuth bearer token; acquiring and refreshing it is the
    ///   caller's responsibility
    pub fn new(client: Box<dyn HttpClient + Send + Sync>, token: String) -> Self {
        Self {
            client: Arc::from(client),
            token,
        }
    }

    /// Replace the bearer token used for subsequent requests.
    pub fn set_token(&mut self, token: String) {
        self.token = token;
    }

    /// Build a request for `url` with the standard headers attached.
    pub(crate) fn request(&self, method: Method, url: &str) -> Result<Request> {
        let url = url
            .parse::<Url>()
            .map_err(|e| TuneError::Http(format!("invalid URL '{url}': {e}")))?;
        let mut request = Request::new(method, url);
        request.insert_header("Authorization", format!("Bearer {}", self.token));
        request.insert_header("Accept", "application/json");
        Ok(request)
    }

    /// Send a prepared request and decode the JSON body.
    ///
    /// Non-success statuses are mapped through the service error envelope;
    /// an empty success body (204-style responses) decodes to `Value::Null`.
    pub(crate) async fn execute(&self, request: Request) -> Result<Value> {
        log::debug!("{} {}", request.method(), request.url());

        let mut response = self
            .client
            .send(request)
            .await
            .map_err(|e| TuneError::Http(e.to_string()))?;

        let status: u16 = response.status().into();
        let body = response
            .body_string()
            .await
            .map_err(|e| TuneError::Http(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(error_from_body(status, &body));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<Value> {
        let request = self.request(Method::Get, url)?;
        self.execute(request).await
    }
}

/// Map a non-success response onto the error taxonomy.
///
/// The service wraps failures as `{"error": {"status", "message"}}`; when
/// that envelope is absent or unreadable the raw status still decides
/// between [`TuneError::Auth`] and [`TuneError::Api`].
fn error_from_body(status: u16, body: &str) -> TuneError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| format!("HTTP {status}"));

    match status {
        401 | 403 => TuneError::Auth(message),
        _ => TuneError::Api { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_map_to_auth_errors() {
        let err = error_from_body(401, r#"{"error": {"status": 401, "message": "Invalid access token"}}"#);
        assert!(matches!(err, TuneError::Auth(ref msg) if msg == "Invalid access token"));
    }

    #[test]
    fn other_statuses_carry_the_envelope_through() {
        let err = error_from_body(404, r#"{"error": {"status": 404, "message": "Not found"}}"#);
        match err {
            TuneError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unreadable_envelope_falls_back_to_the_status() {
        let err = error_from_body(500, "<html>oops</html>");
        match err {
            TuneError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "HTTP 500");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
