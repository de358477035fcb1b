//! Logging and tracing utilities

use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, UtilsError};

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable single-line output
    #[default]
    Pretty,
    /// One JSON object per event, structured fields preserved
    Json,
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `findata_adapters=debug,warn`
    pub filter: String,
    pub format: LogFormat,
    /// Include the event target (module path)
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
            with_target: true,
        }
    }
}

impl LogConfig {
    /// Same defaults, but honor `RUST_LOG` when it is set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(filter) = crate::config::env_secret(EnvFilter::DEFAULT_ENV) {
            config.filter = filter;
        }
        config
    }

    /// Emit JSON lines instead of human readable output
    pub fn json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    /// Parse the filter directive
    pub fn env_filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_new(&self.filter).map_err(|e| UtilsError::InvalidFilter {
            directive: self.filter.clone(),
            reason: e.to_string(),
        })
    }
}

/// Initialize tracing subscriber from an explicit configuration.
///
/// Fails if the filter does not parse or a global subscriber is already set.
pub fn init_tracing_with(config: &LogConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(config.env_filter()?);

    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(config.with_target))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(config.with_target))
            .try_init(),
    }
    .map_err(|e| UtilsError::SubscriberInit(e.to_string()))
}
