//! Price source health probe

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use findata_core::{AdapterError, HealthProbe, ProbeOutcome};
use tracing::{debug, info, warn};

use super::source::{PriceSource, RawBar};

const PROBE_PERIOD: &str = "5d";
const PROBE_INTERVAL: &str = "1d";

/// Fetches a few days of a known ticker.
///
/// Yahoo needs no credential, so the credential step always passes.
pub struct PriceHealthProbe {
    source: Arc<dyn PriceSource>,
    test_ticker: String,
    timeout: Duration,
}

impl PriceHealthProbe {
    pub fn new(
        source: Arc<dyn PriceSource>,
        test_ticker: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            test_ticker: test_ticker.into(),
            timeout,
        }
    }
}

#[async_trait]
impl HealthProbe for PriceHealthProbe {
    async fn probe(&self) -> ProbeOutcome {
        let ticker = self.test_ticker.as_str();
        debug!(adapter = "PriceAdapter", step = "1/3", "no credential required");

        let bars = match self
            .source
            .history(ticker, PROBE_PERIOD, PROBE_INTERVAL, self.timeout)
            .await
        {
            Ok(bars) => bars,
            Err(AdapterError::EmptyResult(_)) => Vec::new(),
            Err(err) => {
                warn!(
                    adapter = "PriceAdapter",
                    step = "2/3",
                    ticker,
                    class = err.class(),
                    "health check failed"
                );
                return ProbeOutcome::fail(format!("Health check failed: {}", err.class()));
            }
        };

        if bars.is_empty() {
            warn!(adapter = "PriceAdapter", step = "3/3", ticker, "empty data returned");
            return ProbeOutcome::fail("Empty data returned");
        }
        if !bars.iter().any(RawBar::has_close) {
            warn!(adapter = "PriceAdapter", step = "3/3", ticker, "no usable close column");
            return ProbeOutcome::fail("Unexpected response format");
        }

        info!(
            adapter = "PriceAdapter",
            step = "3/3",
            ticker,
            bars = bars.len(),
            "health check passed"
        );
        ProbeOutcome::pass("Yahoo Finance operational")
    }
}
