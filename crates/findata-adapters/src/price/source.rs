//! Price history sources

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use findata_core::{AdapterError, ConnectivityKind, Result};
use yahoo_finance_api as yahoo;

/// One bar as delivered by a source, before normalization.
///
/// Any field may be missing; see [`super::normalize::normalize_bars`] for how
/// gaps are filled or dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBar {
    pub date: Option<DateTime<Utc>>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<u64>,
}

impl RawBar {
    /// Bar with only a date and a close
    pub fn close_only(date: DateTime<Utc>, close: f64) -> Self {
        Self {
            date: Some(date),
            close: Some(close),
            ..Self::default()
        }
    }

    /// True if the bar carries a close or adjusted close
    pub fn has_close(&self) -> bool {
        self.close.or(self.adj_close).is_some()
    }
}

/// Source of historical price bars.
///
/// An empty vector and [`AdapterError::EmptyResult`] both mean "no data".
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch bars for `ticker` over `period` (e.g. `"1mo"`, `"1y"`) at
    /// `interval` (e.g. `"1d"`), giving up after `timeout`
    async fn history(
        &self,
        ticker: &str,
        period: &str,
        interval: &str,
        timeout: Duration,
    ) -> Result<Vec<RawBar>>;
}

/// Yahoo Finance chart API via `yahoo_finance_api`
#[derive(Debug, Clone, Default)]
pub struct YahooPriceSource;

impl YahooPriceSource {
    /// Create a new Yahoo Finance source
    pub fn new() -> Self {
        Self
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[async_trait]
impl PriceSource for YahooPriceSource {
    async fn history(
        &self,
        ticker: &str,
        period: &str,
        interval: &str,
        timeout: Duration,
    ) -> Result<Vec<RawBar>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| AdapterError::connectivity(ConnectivityKind::Request, e.to_string()))?;

        tracing::debug!(ticker, period, interval, "Requesting Yahoo Finance history");

        let request = provider.get_quote_range(ticker, interval, period);
        let response = tokio::time::timeout(timeout, request)
            .await
            .map_err(|_| {
                AdapterError::connectivity(
                    ConnectivityKind::Timeout,
                    format!("Yahoo Finance did not answer within {timeout:?}"),
                )
            })?
            .map_err(|e| AdapterError::connectivity(ConnectivityKind::Request, e.to_string()))?;

        // The connector reports a chart without quotes as an error
        let quotes = response
            .quotes()
            .map_err(|e| AdapterError::EmptyResult(e.to_string()))?;

        Ok(quotes
            .iter()
            .map(|q| RawBar {
                date: DateTime::from_timestamp(q.timestamp as i64, 0),
                open: finite(q.open),
                high: finite(q.high),
                low: finite(q.low),
                close: finite(q.close),
                adj_close: finite(q.adjclose),
                volume: Some(q.volume),
            })
            .collect())
    }
}
