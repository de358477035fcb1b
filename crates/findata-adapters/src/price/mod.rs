//! Price adapter backed by Yahoo Finance
//!
//! Price history always comes back non-empty: live bars when the source
//! delivers, otherwise a deterministic random walk keyed by ticker. Company
//! info and statements have no synthetic generator and come back empty (and
//! stub-tagged) when the live call fails.

mod fundamentals;
mod health;
mod normalize;
mod session;
mod source;
mod stub;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use findata_core::{
    Adapter, AdapterError, AdapterState, FetchResult, HealthStatus, HttpClient, HttpRequest,
    ReqwestHttpClient, Result, StubGenerator, sanitize_ticker,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::AdapterConfig;
use session::YahooSession;

pub use fundamentals::{CompanyInfo, StatementKind, StatementTable};
pub use health::PriceHealthProbe;
pub use normalize::normalize_bars;
pub use source::{PriceSource, RawBar, YahooPriceSource};
pub use stub::{RandomWalkStub, STUB_BARS, ticker_seed};

const ADAPTER_NAME: &str = "PriceAdapter";
const RETRY_PERIOD: &str = "1mo";
const RETRY_INTERVAL: &str = "1d";

/// One OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Price history for one ticker, ascending by date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceFrame {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
}

impl PriceFrame {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent close
    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|bar| bar.close)
    }
}

/// Prices, company info and financial statements for equities
pub struct PriceAdapter {
    state: AdapterState,
    source: Arc<dyn PriceSource>,
    http: Arc<dyn HttpClient>,
    session: YahooSession,
    probe: PriceHealthProbe,
    stub: RandomWalkStub,
    request_timeout: Duration,
}

impl PriceAdapter {
    /// Create an adapter on the production Yahoo Finance stack
    pub async fn new(config: &AdapterConfig) -> Result<Self> {
        let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new(&config.user_agent));
        Self::with_parts(config, Arc::new(YahooPriceSource::new()), http).await
    }

    /// Create an adapter on caller-supplied price source and transport
    pub async fn with_parts(
        config: &AdapterConfig,
        source: Arc<dyn PriceSource>,
        http: Arc<dyn HttpClient>,
    ) -> Result<Self> {
        config.validate()?;

        let probe = PriceHealthProbe::new(
            source.clone(),
            sanitize_ticker(&config.price_test_ticker),
            config.health_check_timeout,
        );
        let state = AdapterState::initialize(
            ADAPTER_NAME,
            config.offline,
            &probe,
            config.health_check,
        )
        .await?;

        Ok(Self {
            state,
            source,
            http,
            session: YahooSession::default(),
            probe,
            stub: RandomWalkStub::new(),
            request_timeout: config.request_timeout,
        })
    }

    /// Replace the synthetic series generator
    pub fn with_stub(mut self, stub: RandomWalkStub) -> Self {
        self.stub = stub;
        self
    }

    /// Historical bars for `ticker`; never empty.
    ///
    /// An empty live answer is retried once with `1mo`/`1d` before falling
    /// back to the random walk.
    pub async fn fetch_prices(
        &self,
        ticker: &str,
        period: &str,
        interval: &str,
    ) -> FetchResult<PriceFrame> {
        let ticker = sanitize_ticker(ticker);
        if self.state.stub_mode() {
            return self.stub_prices(&ticker, "Stub mode enabled".to_string());
        }

        match self.load_prices(&ticker, period, interval).await {
            Ok(Some(frame)) => self.live_prices(frame),
            Ok(None) => {
                info!(
                    adapter = ADAPTER_NAME,
                    ticker = %ticker,
                    period,
                    interval,
                    "empty history, retrying with 1mo/1d"
                );
                match self.load_prices(&ticker, RETRY_PERIOD, RETRY_INTERVAL).await {
                    Ok(Some(frame)) => self.live_prices(frame),
                    Ok(None) => self.stub_prices(&ticker, "Empty after retry".to_string()),
                    Err(err) => {
                        error!(
                            adapter = ADAPTER_NAME,
                            ticker = %ticker,
                            class = err.class(),
                            "retry failed: {}",
                            err
                        );
                        self.stub_prices(&ticker, format!("Retry failed: {err}"))
                    }
                }
            }
            Err(err) => {
                error!(
                    adapter = ADAPTER_NAME,
                    ticker = %ticker,
                    class = err.class(),
                    "price fetch failed: {}",
                    err
                );
                self.stub_prices(&ticker, err.to_string())
            }
        }
    }

    /// Company profile; empty and stub-tagged when unavailable
    pub async fn fetch_info(&self, ticker: &str) -> FetchResult<CompanyInfo> {
        let ticker = sanitize_ticker(ticker);
        let request = fundamentals::info_request(&ticker);
        self.fetch_fundamental(&ticker, "info", request, fundamentals::parse_company_info)
            .await
    }

    /// Income statement history
    pub async fn fetch_financials(&self, ticker: &str) -> FetchResult<StatementTable> {
        self.fetch_statement(ticker, StatementKind::Income).await
    }

    /// Balance sheet history
    pub async fn fetch_balance_sheet(&self, ticker: &str) -> FetchResult<StatementTable> {
        self.fetch_statement(ticker, StatementKind::BalanceSheet).await
    }

    /// Cash flow statement history
    pub async fn fetch_cashflow(&self, ticker: &str) -> FetchResult<StatementTable> {
        self.fetch_statement(ticker, StatementKind::Cashflow).await
    }

    async fn fetch_statement(
        &self,
        ticker: &str,
        kind: StatementKind,
    ) -> FetchResult<StatementTable> {
        let ticker = sanitize_ticker(ticker);
        let label = kind.to_string();
        let request = fundamentals::statement_request(&ticker, kind);
        self.fetch_fundamental(&ticker, &label, request, |body| {
            fundamentals::parse_statement(body, kind)
        })
        .await
    }

    /// `Ok(None)` when the source answered with no usable bars
    async fn load_prices(
        &self,
        ticker: &str,
        period: &str,
        interval: &str,
    ) -> Result<Option<PriceFrame>> {
        let raw = match self
            .source
            .history(ticker, period, interval, self.request_timeout)
            .await
        {
            Ok(raw) => raw,
            Err(AdapterError::EmptyResult(_)) => return Ok(None),
            Err(err) => return Err(err),
        };

        let bars = normalize_bars(raw);
        if bars.is_empty() {
            return Ok(None);
        }
        Ok(Some(PriceFrame {
            ticker: ticker.to_string(),
            bars,
        }))
    }

    fn live_prices(&self, frame: PriceFrame) -> FetchResult<PriceFrame> {
        info!(
            adapter = ADAPTER_NAME,
            ticker = %frame.ticker,
            bars = frame.len(),
            "fetched live prices"
        );
        FetchResult::live(frame)
    }

    fn stub_prices(&self, ticker: &str, reason: String) -> FetchResult<PriceFrame> {
        warn!(adapter = ADAPTER_NAME, ticker, reason = %reason, "serving stub prices");
        let frame = self.stub.generate(ticker, Some(reason.as_str()));
        FetchResult::stub(frame, Some(reason))
    }

    /// One authenticated `quoteSummary` call.
    ///
    /// A 401 drops the cached crumb so the next call repeats the handshake.
    async fn quote_summary(&self, request: HttpRequest) -> Result<Value> {
        let crumb = self
            .session
            .crumb(self.http.as_ref(), self.request_timeout)
            .await?;
        let request = request
            .with_query("crumb", crumb)
            .with_timeout(self.request_timeout);

        let response = self.http.execute(request).await?;
        if response.status == 401 {
            self.session.invalidate().await;
        }
        Ok(response.error_for_status()?.json()?)
    }

    async fn fetch_fundamental<T, F>(
        &self,
        ticker: &str,
        what: &str,
        request: HttpRequest,
        parse: F,
    ) -> FetchResult<T>
    where
        T: Default,
        F: FnOnce(&Value) -> Result<T>,
    {
        if self.state.stub_mode() {
            warn!(adapter = ADAPTER_NAME, ticker, what, "stub mode, returning empty {}", what);
            return FetchResult::stub(T::default(), Some("Stub mode enabled".to_string()));
        }

        let outcome = self
            .quote_summary(request)
            .await
            .and_then(|body| parse(&body));

        match outcome {
            Ok(data) => {
                info!(adapter = ADAPTER_NAME, ticker, what, "fetched live {}", what);
                FetchResult::live(data)
            }
            Err(err) => {
                error!(
                    adapter = ADAPTER_NAME,
                    ticker,
                    what,
                    class = err.class(),
                    "{} fetch failed: {}",
                    what,
                    err
                );
                FetchResult::stub(T::default(), Some(err.to_string()))
            }
        }
    }
}

#[async_trait]
impl Adapter for PriceAdapter {
    fn state(&self) -> &AdapterState {
        &self.state
    }

    async fn run_health_check(&mut self) -> &HealthStatus {
        self.state.refresh(&self.probe).await
    }
}
