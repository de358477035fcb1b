//! Shared utilities for findata
//!
//! Application-edge helpers: tracing subscriber setup and reading API secrets
//! from the process environment. Adapter crates never touch process state
//! themselves; binaries call into this crate and pass the results down as
//! explicit configuration.

pub mod config;
pub mod error;
pub mod logging;

pub use config::env_secret;
pub use error::{Result, UtilsError};
pub use logging::{LogConfig, LogFormat, init_tracing_with};
