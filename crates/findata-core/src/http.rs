//! HTTP transport seam used by API-backed adapters
//!
//! Adapters never talk to `reqwest` directly; they build an [`HttpRequest`]
//! and hand it to an [`HttpClient`]. Production code uses
//! [`ReqwestHttpClient`], tests substitute canned transports.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// Minimal HTTP method set needed by adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Outgoing request envelope
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Per-call deadline; a request never outlives it
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            query: Vec::new(),
            body: None,
            timeout: Duration::from_secs(20),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Look up a query parameter by name
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Response envelope returned by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Turn a non-2xx status into an error
    pub fn error_for_status(self) -> Result<Self, HttpError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(HttpError::new(
                HttpErrorKind::Status(self.status),
                format!("HTTP {}", self.status),
            ))
        }
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Transport error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorKind {
    Timeout,
    Connect,
    Status(u16),
    Body,
    Request,
}

/// Transport-level HTTP error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    kind: HttpErrorKind,
    message: String,
}

impl HttpError {
    pub fn new(kind: HttpErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> HttpErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            HttpErrorKind::Timeout
        } else if err.is_connect() {
            HttpErrorKind::Connect
        } else if let Some(status) = err.status() {
            HttpErrorKind::Status(status.as_u16())
        } else if err.is_body() || err.is_decode() {
            HttpErrorKind::Body
        } else {
            HttpErrorKind::Request
        };
        Self::new(kind, err.to_string())
    }
}

/// Adapter transport contract
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute a single request, honoring its timeout
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Production transport backed by a reusable `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a client that identifies itself with `user_agent`.
    ///
    /// Cookies set by responses are kept and replayed on later requests.
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .cookie_store(true)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    /// Wrap an existing `reqwest::Client`
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!("Sending {:?} request to {}", request.method, request.url);

        let response = builder.timeout(request.timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_names_are_lowercased() {
        let request = HttpRequest::get("https://example.test/v2").with_header("X-Api-Key", "demo");
        assert_eq!(request.headers.get("x-api-key").map(String::as_str), Some("demo"));
    }

    #[test]
    fn test_query_lookup() {
        let request = HttpRequest::get("https://example.test/v2")
            .with_query("q", "AAPL")
            .with_query("pageSize", "50");
        assert_eq!(request.query_param("pageSize"), Some("50"));
        assert_eq!(request.query_param("missing"), None);
    }

    #[test]
    fn test_error_for_status() {
        let ok = HttpResponse::ok_json("{}").error_for_status();
        assert!(ok.is_ok());

        let err = HttpResponse {
            status: 401,
            body: String::new(),
        }
        .error_for_status()
        .unwrap_err();
        assert_eq!(err.kind(), HttpErrorKind::Status(401));
    }

    #[test]
    fn test_response_json() {
        let response = HttpResponse::ok_json(r#"{"articles": []}"#);
        let value = response.json().unwrap();
        assert!(value["articles"].is_array());
    }
}
