//! SEC filings adapter backed by sec-api.io

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use findata_core::{
    Adapter, AdapterError, AdapterState, ApiHealthProbe, Credential, FetchResult, HealthStatus,
    HttpClient, HttpRequest, ReqwestHttpClient, Result, StubGenerator, sanitize_ticker,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::config::{AdapterConfig, SEC_API_KEY_ENV};

const ADAPTER_NAME: &str = "FilingsAdapter";
const QUERY_URL: &str = "https://api.sec-api.io";
const HEALTH_QUERY: &str = r#"ticker:AAPL AND formType:"10-K""#;

/// Form types requested by default
pub const DEFAULT_FORM_TYPES: &[&str] = &["10-K", "10-Q"];

/// Filings requested by default
pub const DEFAULT_LIMIT: usize = 3;

/// One regulatory filing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filing {
    pub form: String,
    /// `YYYY-MM-DD`
    pub filing_date: String,
    pub text: String,
    pub url: String,
    pub is_stub: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFiling {
    #[serde(default)]
    form_type: String,
    #[serde(default)]
    filed_at: String,
    company_name: Option<String>,
    #[serde(default)]
    link_to_filing_details: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    filings: Vec<WireFiling>,
}

impl WireFiling {
    fn into_filing(self, ticker: &str) -> Filing {
        let company = self.company_name.as_deref().unwrap_or(ticker);
        Filing {
            text: format!("{company} filed {}.", self.form_type),
            filing_date: self.filed_at.chars().take(10).collect(),
            form: self.form_type,
            url: self.link_to_filing_details,
            is_stub: false,
        }
    }
}

/// Request identity for the filings stub
#[derive(Debug, Clone, Copy)]
pub struct FilingsRequest<'a> {
    pub ticker: &'a str,
    pub limit: usize,
}

/// `limit` identical synthetic filings
#[derive(Debug, Clone, Copy, Default)]
pub struct StubFilings;

impl StubGenerator<FilingsRequest<'_>> for StubFilings {
    type Output = Vec<Filing>;

    fn generate(&self, request: &FilingsRequest<'_>, _reason: Option<&str>) -> Vec<Filing> {
        let filing = Filing {
            form: "10-Q".to_string(),
            filing_date: "2025-08-01".to_string(),
            text: format!(
                "{} reported EPS beat; management raised guidance; risk factors discussed.",
                request.ticker
            ),
            url: "(stub)".to_string(),
            is_stub: true,
        };
        vec![filing; request.limit]
    }
}

/// Full-text search query for `ticker` restricted to `form_types`
pub fn build_query(ticker: &str, form_types: &[&str]) -> String {
    let forms = form_types
        .iter()
        .map(|form| format!("formType:\"{form}\""))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("ticker:{ticker} AND ({forms})")
}

fn query_request(query: &str, size: usize, timeout: Duration) -> HttpRequest {
    HttpRequest::post(QUERY_URL)
        .with_json(json!({
            "query": query,
            "from": "0",
            "size": size.to_string(),
            "sort": [{"filedAt": {"order": "desc"}}],
        }))
        .with_timeout(timeout)
}

/// Latest 10-K/10-Q style filings for equities
pub struct FilingsAdapter {
    state: AdapterState,
    credential: Credential,
    http: Option<Arc<dyn HttpClient>>,
    probe: ApiHealthProbe,
    stub: StubFilings,
    request_timeout: Duration,
}

impl FilingsAdapter {
    /// Create an adapter; a reqwest session is opened only when a key is set
    pub async fn new(config: &AdapterConfig) -> Result<Self> {
        let http = config
            .sec_api_key
            .as_ref()
            .map(|_| Arc::new(ReqwestHttpClient::new(&config.user_agent)) as Arc<dyn HttpClient>);
        Self::build(config, http).await
    }

    /// Create an adapter on a caller-supplied transport
    pub async fn with_transport(config: &AdapterConfig, http: Arc<dyn HttpClient>) -> Result<Self> {
        Self::build(config, Some(http)).await
    }

    async fn build(config: &AdapterConfig, http: Option<Arc<dyn HttpClient>>) -> Result<Self> {
        config.validate()?;

        let credential = Credential::new(SEC_API_KEY_ENV, config.sec_api_key.clone());
        let http = http.filter(|_| credential.is_present() && !config.offline);
        let stub_mode = http.is_none();

        let ping = query_request(HEALTH_QUERY, 1, config.health_check_timeout);
        let probe = ApiHealthProbe::new(
            ADAPTER_NAME,
            credential.clone(),
            "Authorization",
            http.clone(),
            ping,
        )
        .expect_collection("filings")
        .operational_message("SEC API operational");

        let state =
            AdapterState::initialize(ADAPTER_NAME, stub_mode, &probe, config.health_check).await?;

        Ok(Self {
            state,
            credential,
            http,
            probe,
            stub: StubFilings,
            request_timeout: config.request_timeout,
        })
    }

    /// Most recent filings of `form_types` for `ticker`, newest first.
    ///
    /// Without a key, or on any failure, `limit` synthetic filings come back
    /// instead. A live answer with no filings stays an empty live result.
    pub async fn latest_filings(
        &self,
        ticker: &str,
        form_types: &[&str],
        limit: usize,
    ) -> FetchResult<Vec<Filing>> {
        let ticker = sanitize_ticker(ticker);
        let request = FilingsRequest {
            ticker: &ticker,
            limit,
        };

        let (Some(http), Some(key)) = (&self.http, self.credential.value()) else {
            warn!(adapter = ADAPTER_NAME, ticker = %ticker, "using stub SEC data");
            return self.stub_filings(&request, self.unavailable_reason());
        };

        match self
            .request_filings(http.as_ref(), key, &ticker, form_types, limit)
            .await
        {
            Ok(filings) => {
                info!(
                    adapter = ADAPTER_NAME,
                    ticker = %ticker,
                    count = filings.len(),
                    "fetched SEC filings"
                );
                FetchResult::live(filings)
            }
            Err(err) => {
                error!(
                    adapter = ADAPTER_NAME,
                    ticker = %ticker,
                    class = err.class(),
                    "SEC API error: {}",
                    err
                );
                self.stub_filings(&request, err.to_string())
            }
        }
    }

    fn stub_filings(
        &self,
        request: &FilingsRequest<'_>,
        reason: String,
    ) -> FetchResult<Vec<Filing>> {
        let filings = self.stub.generate(request, Some(reason.as_str()));
        FetchResult::stub(filings, Some(reason))
    }

    /// A stored key without a session means the adapter was built offline
    fn unavailable_reason(&self) -> String {
        if self.credential.is_present() {
            "Offline mode enabled".to_string()
        } else {
            self.credential.missing_error().to_string()
        }
    }

    /// [`Self::latest_filings`] with 10-K/10-Q and a limit of 3
    pub async fn latest_filings_default(&self, ticker: &str) -> FetchResult<Vec<Filing>> {
        self.latest_filings(ticker, DEFAULT_FORM_TYPES, DEFAULT_LIMIT).await
    }

    async fn request_filings(
        &self,
        http: &dyn HttpClient,
        key: &str,
        ticker: &str,
        form_types: &[&str],
        limit: usize,
    ) -> Result<Vec<Filing>> {
        let request = query_request(&build_query(ticker, form_types), limit, self.request_timeout)
            .with_header("Authorization", key);

        let response = http.execute(request).await?.error_for_status()?;
        let body: QueryResponse =
            serde_json::from_str(&response.body).map_err(AdapterError::from)?;

        Ok(body
            .filings
            .into_iter()
            .map(|wire| wire.into_filing(ticker))
            .collect())
    }
}

#[async_trait]
impl Adapter for FilingsAdapter {
    fn state(&self) -> &AdapterState {
        &self.state
    }

    async fn run_health_check(&mut self) -> &HealthStatus {
        self.state.refresh(&self.probe).await
    }
}
