//! Error types for the utility helpers

use thiserror::Error;

/// Utility errors
#[derive(Debug, Error)]
pub enum UtilsError {
    /// The log filter directive could not be parsed
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    /// A global subscriber was already installed
    #[error("Tracing subscriber init failed: {0}")]
    SubscriberInit(String),
}

/// Result type alias for utility operations
pub type Result<T> = std::result::Result<T, UtilsError>;
