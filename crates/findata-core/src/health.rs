//! Health probes and health status
//!
//! A probe answers one question: is the live path of an adapter usable right
//! now? [`ApiHealthProbe`] implements the three-step protocol shared by every
//! credentialed HTTP source:
//!
//! 1. credential presence (no network I/O when absent)
//! 2. connectivity, classified by transport error kind
//! 3. response shape, where a parseable but unexpected body is a soft failure
//!
//! Steps short-circuit, and running a probe twice has no side effects.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{AdapterError, ConnectivityKind};
use crate::http::{HttpClient, HttpRequest};

/// Health snapshot of one adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub message: String,
    pub checked_at: DateTime<Utc>,
    pub stub_mode: bool,
}

impl HealthStatus {
    /// Status of an adapter whose probe has not run yet
    pub fn untested(stub_mode: bool) -> Self {
        Self {
            healthy: false,
            message: "Not tested".to_string(),
            checked_at: Utc::now(),
            stub_mode,
        }
    }
}

/// Verdict produced by a probe run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub healthy: bool,
    pub message: String,
}

impl ProbeOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            healthy: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            healthy: false,
            message: message.into(),
        }
    }
}

/// Strategy that checks whether an adapter's live path is usable
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self) -> ProbeOutcome;
}

/// A named secret, possibly absent.
///
/// The value is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    name: String,
    value: Option<String>,
}

impl Credential {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        // Blank secrets count as missing
        let value = value.filter(|v| !v.trim().is_empty());
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    /// The error reported when this credential is needed but absent
    pub fn missing_error(&self) -> AdapterError {
        AdapterError::CredentialMissing {
            credential: self.name.clone(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("name", &self.name)
            .field("present", &self.is_present())
            .finish()
    }
}

/// Three-step probe for credentialed JSON APIs
pub struct ApiHealthProbe {
    adapter: String,
    credential: Credential,
    credential_header: String,
    http: Option<Arc<dyn HttpClient>>,
    ping: HttpRequest,
    collection_field: String,
    operational_message: String,
}

impl ApiHealthProbe {
    /// Create a probe.
    ///
    /// # Arguments
    /// * `adapter` - adapter name used in log events
    /// * `credential` - secret checked in step 1
    /// * `credential_header` - header the secret is sent in during step 2
    /// * `http` - transport; `None` when the adapter has no session
    /// * `ping` - minimal low-cost request used for step 2
    pub fn new(
        adapter: impl Into<String>,
        credential: Credential,
        credential_header: impl Into<String>,
        http: Option<Arc<dyn HttpClient>>,
        ping: HttpRequest,
    ) -> Self {
        Self {
            adapter: adapter.into(),
            credential,
            credential_header: credential_header.into(),
            http,
            ping,
            collection_field: "data".to_string(),
            operational_message: "API operational".to_string(),
        }
    }

    /// Top-level field that must hold an array in the ping response
    pub fn expect_collection(mut self, field: impl Into<String>) -> Self {
        self.collection_field = field.into();
        self
    }

    /// Message reported when all steps pass
    pub fn operational_message(mut self, message: impl Into<String>) -> Self {
        self.operational_message = message.into();
        self
    }

    fn check_shape(&self, body: &Value) -> ProbeOutcome {
        let adapter = self.adapter.as_str();
        match body.get(&self.collection_field) {
            Some(field) if field.is_array() => {
                info!(adapter, step = "3/3", "health check passed");
                ProbeOutcome::pass(self.operational_message.clone())
            }
            _ => {
                warn!(
                    adapter,
                    step = "3/3",
                    field = %self.collection_field,
                    "unexpected response format"
                );
                ProbeOutcome::fail("Unexpected response format")
            }
        }
    }
}

#[async_trait]
impl HealthProbe for ApiHealthProbe {
    async fn probe(&self) -> ProbeOutcome {
        let adapter = self.adapter.as_str();
        debug!(adapter, "running health check");

        let Some(key) = self.credential.value() else {
            warn!(
                adapter,
                step = "1/3",
                credential = self.credential.name(),
                "health check failed: credential missing"
            );
            return ProbeOutcome::fail(self.credential.missing_error().to_string());
        };
        debug!(adapter, step = "1/3", "credential present");

        let Some(http) = &self.http else {
            warn!(adapter, step = "2/3", "health check failed: no HTTP session");
            return ProbeOutcome::fail(format!(
                "API connection failed: {}",
                ConnectivityKind::Request
            ));
        };

        let request = self
            .ping
            .clone()
            .with_header(self.credential_header.clone(), key);
        let response = match http.execute(request).await.and_then(|r| r.error_for_status()) {
            Ok(response) => response,
            Err(err) => {
                let kind = ConnectivityKind::from(err.kind());
                warn!(adapter, step = "2/3", class = %kind, "health check failed: connectivity");
                return ProbeOutcome::fail(format!("API connection failed: {kind}"));
            }
        };
        debug!(adapter, step = "2/3", status = response.status, "connection ok");

        match response.json() {
            Ok(body) => self.check_shape(&body),
            Err(err) => {
                let err = AdapterError::from(err);
                warn!(adapter, step = "3/3", class = err.class(), "response parsing failed");
                ProbeOutcome::fail(format!("Response parsing failed: {}", err.class()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpError, HttpErrorKind, HttpResponse};

    mockall::mock! {
        Transport {}

        #[async_trait]
        impl HttpClient for Transport {
            async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
        }
    }

    fn probe_with(credential: Option<&str>, http: Option<MockTransport>) -> ApiHealthProbe {
        ApiHealthProbe::new(
            "TestAdapter",
            Credential::new("TEST_API_KEY", credential.map(str::to_string)),
            "X-Api-Key",
            http.map(|h| Arc::new(h) as Arc<dyn HttpClient>),
            HttpRequest::get("https://example.test/ping").with_query("pageSize", "1"),
        )
        .expect_collection("articles")
        .operational_message("Test API operational")
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        let mut http = MockTransport::new();
        http.expect_execute().times(0);

        let outcome = probe_with(None, Some(http)).probe().await;
        assert!(!outcome.healthy);
        assert_eq!(outcome.message, "No TEST_API_KEY configured");
    }

    #[tokio::test]
    async fn test_blank_credential_counts_as_missing() {
        let outcome = probe_with(Some("   "), None).probe().await;
        assert!(!outcome.healthy);
        assert!(outcome.message.contains("TEST_API_KEY"));
    }

    #[tokio::test]
    async fn test_connectivity_failure_is_classified_by_kind() {
        let mut http = MockTransport::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Err(HttpError::new(HttpErrorKind::Timeout, "operation timed out")));

        let outcome = probe_with(Some("secret"), Some(http)).probe().await;
        assert!(!outcome.healthy);
        assert_eq!(outcome.message, "API connection failed: Timeout");
    }

    #[tokio::test]
    async fn test_error_status_is_connectivity_failure() {
        let mut http = MockTransport::new();
        http.expect_execute().returning(|_| {
            Ok(HttpResponse {
                status: 401,
                body: r#"{"status":"error"}"#.to_string(),
            })
        });

        let outcome = probe_with(Some("secret"), Some(http)).probe().await;
        assert_eq!(outcome.message, "API connection failed: HTTPError");
    }

    #[tokio::test]
    async fn test_credential_is_sent_in_header() {
        let mut http = MockTransport::new();
        http.expect_execute()
            .withf(|req| req.headers.get("x-api-key").map(String::as_str) == Some("secret"))
            .times(1)
            .returning(|_| Ok(HttpResponse::ok_json(r#"{"articles": []}"#)));

        let outcome = probe_with(Some("secret"), Some(http)).probe().await;
        assert!(outcome.healthy);
        assert_eq!(outcome.message, "Test API operational");
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_soft_failure() {
        let mut http = MockTransport::new();
        http.expect_execute()
            .returning(|_| Ok(HttpResponse::ok_json(r#"{"articles": "none"}"#)));

        let outcome = probe_with(Some("secret"), Some(http)).probe().await;
        assert!(!outcome.healthy);
        assert_eq!(outcome.message, "Unexpected response format");
    }

    #[tokio::test]
    async fn test_missing_field_is_soft_failure() {
        let mut http = MockTransport::new();
        http.expect_execute()
            .returning(|_| Ok(HttpResponse::ok_json(r#"{"status": "ok"}"#)));

        let outcome = probe_with(Some("secret"), Some(http)).probe().await;
        assert_eq!(outcome.message, "Unexpected response format");
    }

    #[tokio::test]
    async fn test_unparseable_body() {
        let mut http = MockTransport::new();
        http.expect_execute()
            .returning(|_| Ok(HttpResponse::ok_json("<html>maintenance</html>")));

        let outcome = probe_with(Some("secret"), Some(http)).probe().await;
        assert_eq!(outcome.message, "Response parsing failed: JSONDecodeError");
    }

    #[tokio::test]
    async fn test_probe_is_repeatable() {
        let mut http = MockTransport::new();
        http.expect_execute()
            .times(2)
            .returning(|_| Ok(HttpResponse::ok_json(r#"{"articles": [{}]}"#)));

        let probe = probe_with(Some("secret"), Some(http));
        let first = probe.probe().await;
        let second = probe.probe().await;
        assert_eq!(first, second);
    }

    #[test]
    fn test_credential_debug_hides_value() {
        let credential = Credential::new("SEC_API_KEY", Some("top-secret".to_string()));
        let rendered = format!("{credential:?}");
        assert!(rendered.contains("SEC_API_KEY"));
        assert!(!rendered.contains("top-secret"));
    }
}
