//! Error types for findata-core

use std::fmt;

use thiserror::Error;

use crate::http::{HttpError, HttpErrorKind};

/// Result type alias for findata-core
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Connectivity failure classification.
///
/// Failures are classified by the kind of transport error, never by parsing
/// the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityKind {
    /// The per-call deadline elapsed
    Timeout,
    /// TCP/TLS connection could not be established
    Connect,
    /// The server answered with a non-success status
    Status(u16),
    /// The response body could not be read
    Body,
    /// Any other request failure
    Request,
}

impl ConnectivityKind {
    /// Short class name used in health messages and log events
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "Timeout",
            Self::Connect => "ConnectError",
            Self::Status(_) => "HTTPError",
            Self::Body => "BodyError",
            Self::Request => "RequestError",
        }
    }
}

impl fmt::Display for ConnectivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpErrorKind> for ConnectivityKind {
    fn from(kind: HttpErrorKind) -> Self {
        match kind {
            HttpErrorKind::Timeout => Self::Timeout,
            HttpErrorKind::Connect => Self::Connect,
            HttpErrorKind::Status(code) => Self::Status(code),
            HttpErrorKind::Body => Self::Body,
            HttpErrorKind::Request => Self::Request,
        }
    }
}

/// Error type for adapter operations
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Required credential is not configured
    #[error("No {credential} configured")]
    CredentialMissing {
        /// Name of the missing credential (e.g. `NEWSAPI_KEY`)
        credential: String,
    },

    /// Upstream could not be reached or answered with an error
    #[error("Connectivity failure ({kind}): {message}")]
    Connectivity {
        kind: ConnectivityKind,
        message: String,
    },

    /// Response parsed but did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Upstream answered successfully with no data
    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// Health check failed during construction and the caller opted into fail-fast
    #[error("Health Check failed: {0}")]
    HealthCheckFailed(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdapterError {
    /// Create a connectivity error
    pub fn connectivity(kind: ConnectivityKind, message: impl Into<String>) -> Self {
        Self::Connectivity {
            kind,
            message: message.into(),
        }
    }

    /// Short failure class recorded in logs and stub reasons
    pub fn class(&self) -> &'static str {
        match self {
            Self::CredentialMissing { .. } => "CredentialMissing",
            Self::Connectivity { kind, .. } => kind.as_str(),
            Self::MalformedResponse(_) => "MalformedResponse",
            Self::EmptyResult(_) => "EmptyResult",
            Self::HealthCheckFailed(_) => "HealthCheckFailed",
            Self::Config(_) => "ConfigError",
            Self::Json(_) => "JSONDecodeError",
        }
    }
}

impl From<HttpError> for AdapterError {
    fn from(err: HttpError) -> Self {
        Self::Connectivity {
            kind: err.kind().into(),
            message: err.message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AdapterError::CredentialMissing {
            credential: "NEWSAPI_KEY".to_string(),
        };
        assert_eq!(err.to_string(), "No NEWSAPI_KEY configured");

        let err = AdapterError::HealthCheckFailed("Empty data returned".to_string());
        assert_eq!(err.to_string(), "Health Check failed: Empty data returned");
    }

    #[test]
    fn test_class_follows_transport_kind() {
        let err: AdapterError = HttpError::new(HttpErrorKind::Timeout, "deadline elapsed").into();
        assert_eq!(err.class(), "Timeout");

        let err: AdapterError = HttpError::new(HttpErrorKind::Status(503), "unavailable").into();
        assert_eq!(err.class(), "HTTPError");
        assert!(matches!(
            err,
            AdapterError::Connectivity {
                kind: ConnectivityKind::Status(503),
                ..
            }
        ));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: AdapterError = parse.unwrap_err().into();
        assert_eq!(err.class(), "JSONDecodeError");
    }
}
