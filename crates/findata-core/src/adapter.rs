//! Core Adapter trait definition

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::health::{HealthProbe, HealthStatus};
use crate::{AdapterError, Result};

/// What to do with the health probe at construction time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckPolicy {
    /// Run the probe before the constructor returns
    pub enabled: bool,
    /// Fail construction when the probe reports unhealthy
    pub fail_on_error: bool,
}

impl HealthCheckPolicy {
    /// Skip the probe entirely
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            fail_on_error: false,
        }
    }

    /// Run the probe, record the verdict, never fail construction
    pub const fn report_only() -> Self {
        Self {
            enabled: true,
            fail_on_error: false,
        }
    }

    /// Run the probe and refuse to construct an unhealthy adapter
    pub const fn strict() -> Self {
        Self {
            enabled: true,
            fail_on_error: true,
        }
    }
}

/// Identity, health and stub flag shared by every adapter.
///
/// Only construction and explicit health re-runs mutate it; fetch methods
/// read it.
#[derive(Debug, Clone)]
pub struct AdapterState {
    name: String,
    health: HealthStatus,
    stub_mode: bool,
}

impl AdapterState {
    /// Build the state and apply the construction-time health policy
    pub async fn initialize(
        name: impl Into<String>,
        stub_mode: bool,
        probe: &dyn HealthProbe,
        policy: HealthCheckPolicy,
    ) -> Result<Self> {
        let mut state = Self {
            name: name.into(),
            health: HealthStatus::untested(stub_mode),
            stub_mode,
        };

        if policy.enabled {
            state.refresh(probe).await;
            if !state.health.healthy && policy.fail_on_error {
                return Err(AdapterError::HealthCheckFailed(state.health.message.clone()));
            }
        }

        Ok(state)
    }

    /// Re-run the probe and record its verdict
    pub async fn refresh(&mut self, probe: &dyn HealthProbe) -> &HealthStatus {
        let outcome = probe.probe().await;
        if outcome.healthy {
            info!(adapter = %self.name, "Health Check Passed");
        } else {
            warn!(adapter = %self.name, reason = %outcome.message, "Health Check Failed");
        }

        self.health = HealthStatus {
            healthy: outcome.healthy,
            message: outcome.message,
            checked_at: Utc::now(),
            stub_mode: self.stub_mode,
        };
        &self.health
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> &HealthStatus {
        &self.health
    }

    pub fn stub_mode(&self) -> bool {
        self.stub_mode
    }
}

/// Core trait that all data adapters implement
///
/// Fetch operations are inherent methods on each adapter because their
/// request and payload types differ; this trait covers the uniform health
/// surface.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Shared adapter state
    fn state(&self) -> &AdapterState;

    /// Re-run the adapter's health probe
    async fn run_health_check(&mut self) -> &HealthStatus;

    /// Get the adapter's name
    fn name(&self) -> &str {
        self.state().name()
    }

    /// Snapshot of the last health verdict
    fn health_status(&self) -> HealthStatus {
        self.state().health().clone()
    }

    /// True if the last health check passed
    fn is_healthy(&self) -> bool {
        self.state().health().healthy
    }

    /// True if the live path is disabled for this adapter
    fn is_stub_mode(&self) -> bool {
        self.state().stub_mode()
    }
}
