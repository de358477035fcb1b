//! News adapter backed by NewsAPI
//!
//! [`NewsAdapter::run_chain`] ingests recent articles for a ticker and runs
//! them through the [`pipeline`]. Without a key, or when the live call
//! fails, two synthetic articles stand in so the pipeline always has input.

pub mod pipeline;
mod stub;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use findata_core::{
    Adapter, AdapterError, AdapterState, ApiHealthProbe, Credential, FetchResult, HealthStatus,
    HttpClient, HttpRequest, ReqwestHttpClient, Result, StubGenerator, sanitize_ticker,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::{AdapterConfig, NEWSAPI_KEY_ENV};

pub use pipeline::{
    ClassificationSummary, Entities, NewsDigest, Sample, Sentiment, SentimentCounts, Snippet,
};
pub use stub::StubArticles;

const ADAPTER_NAME: &str = "NewsAdapter";
const EVERYTHING_URL: &str = "https://newsapi.org/v2/everything";
const PAGE_SIZE: &str = "50";

/// Default look-back window for [`NewsAdapter::run_chain`]
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// News article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub content: String,
    /// ISO-8601 publish time
    pub published_at: String,
}

impl Article {
    fn published(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.published_at).ok()
    }
}

/// NewsAPI article; any field may be null
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    published_at: Option<String>,
}

impl From<WireArticle> for Article {
    fn from(wire: WireArticle) -> Self {
        Self {
            title: wire.title.unwrap_or_default(),
            description: wire.description.unwrap_or_default(),
            content: wire.content.unwrap_or_default(),
            published_at: wire.published_at.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<WireArticle>,
}

/// Sort newest first; unparseable publish times go last
fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.published().cmp(&a.published()));
}

/// News sentiment for equities
pub struct NewsAdapter {
    state: AdapterState,
    credential: Credential,
    http: Option<Arc<dyn HttpClient>>,
    probe: ApiHealthProbe,
    stub: StubArticles,
    request_timeout: Duration,
}

impl NewsAdapter {
    /// Create an adapter; a reqwest session is opened only when a key is set
    pub async fn new(config: &AdapterConfig) -> Result<Self> {
        let http = config
            .news_api_key
            .as_ref()
            .map(|_| Arc::new(ReqwestHttpClient::new(&config.user_agent)) as Arc<dyn HttpClient>);
        Self::build(config, http).await
    }

    /// Create an adapter on a caller-supplied transport.
    ///
    /// The transport is still dropped when no key is configured.
    pub async fn with_transport(config: &AdapterConfig, http: Arc<dyn HttpClient>) -> Result<Self> {
        Self::build(config, Some(http)).await
    }

    async fn build(config: &AdapterConfig, http: Option<Arc<dyn HttpClient>>) -> Result<Self> {
        config.validate()?;

        let credential = Credential::new(NEWSAPI_KEY_ENV, config.news_api_key.clone());
        let http = http.filter(|_| credential.is_present() && !config.offline);
        let stub_mode = http.is_none();
        if stub_mode {
            warn!(adapter = ADAPTER_NAME, "no session, news will be served from stub articles");
        }

        let ping = HttpRequest::get(EVERYTHING_URL)
            .with_query("q", "test")
            .with_query("pageSize", "1")
            .with_timeout(config.health_check_timeout);
        let probe = ApiHealthProbe::new(
            ADAPTER_NAME,
            credential.clone(),
            "X-Api-Key",
            http.clone(),
            ping,
        )
        .expect_collection("articles")
        .operational_message("News API operational");

        let state =
            AdapterState::initialize(ADAPTER_NAME, stub_mode, &probe, config.health_check).await?;

        Ok(Self {
            state,
            credential,
            http,
            probe,
            stub: StubArticles,
            request_timeout: config.request_timeout,
        })
    }

    /// Ingest stage alone: recent articles for `ticker`, newest first
    pub async fn fetch_articles(
        &self,
        ticker: &str,
        window_days: u32,
    ) -> FetchResult<Vec<Article>> {
        let ticker = sanitize_ticker(ticker);

        let (Some(http), Some(key)) = (&self.http, self.credential.value()) else {
            warn!(adapter = ADAPTER_NAME, ticker = %ticker, "using stub news data");
            return self.stub_articles(&ticker, self.unavailable_reason());
        };

        match self
            .request_articles(http.as_ref(), key, &ticker, window_days)
            .await
        {
            Ok(articles) => {
                info!(
                    adapter = ADAPTER_NAME,
                    ticker = %ticker,
                    count = articles.len(),
                    "fetched articles"
                );
                FetchResult::live(articles)
            }
            Err(err) => {
                error!(
                    adapter = ADAPTER_NAME,
                    ticker = %ticker,
                    class = err.class(),
                    "News API error: {}",
                    err
                );
                self.stub_articles(&ticker, err.to_string())
            }
        }
    }

    fn stub_articles(&self, ticker: &str, reason: String) -> FetchResult<Vec<Article>> {
        let articles = self.stub.generate(ticker, Some(reason.as_str()));
        FetchResult::stub(articles, Some(reason))
    }

    /// A stored key without a session means the adapter was built offline
    fn unavailable_reason(&self) -> String {
        if self.credential.is_present() {
            "Offline mode enabled".to_string()
        } else {
            self.credential.missing_error().to_string()
        }
    }

    /// Ingest, then preprocess, classify, extract and summarize.
    ///
    /// The digest is flagged stub when there is no session or exactly two
    /// articles were ingested (the size of the stub set), even if those two
    /// came from a live call.
    pub async fn run_chain(&self, ticker: &str, window_days: u32) -> FetchResult<NewsDigest> {
        let ingested = self.fetch_articles(ticker, window_days).await;
        let digest = pipeline::digest(ingested.data());
        debug!(adapter = ADAPTER_NAME, counts = ?digest.counts, "classified articles");

        let session_absent = self.http.is_none();
        if session_absent || digest.article_count == 2 {
            let reason = ingested
                .stub_reason()
                .map_or_else(|| "Two articles ingested".to_string(), str::to_string);
            FetchResult::stub(digest, Some(reason))
        } else {
            FetchResult::live(digest)
        }
    }

    async fn request_articles(
        &self,
        http: &dyn HttpClient,
        key: &str,
        ticker: &str,
        window_days: u32,
    ) -> Result<Vec<Article>> {
        let from = TimeDelta::try_days(i64::from(window_days))
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .ok_or_else(|| {
                AdapterError::Config(format!("window_days {window_days} is out of range"))
            })?
            .format("%Y-%m-%d")
            .to_string();
        let request = HttpRequest::get(EVERYTHING_URL)
            .with_header("X-Api-Key", key)
            .with_query("q", ticker)
            .with_query("language", "en")
            .with_query("pageSize", PAGE_SIZE)
            .with_query("sortBy", "publishedAt")
            .with_query("from", from)
            .with_timeout(self.request_timeout);

        let response = http.execute(request).await?.error_for_status()?;
        let body: EverythingResponse =
            serde_json::from_str(&response.body).map_err(AdapterError::from)?;

        let mut articles: Vec<Article> = body.articles.into_iter().map(Article::from).collect();
        sort_newest_first(&mut articles);
        Ok(articles)
    }
}

#[async_trait]
impl Adapter for NewsAdapter {
    fn state(&self) -> &AdapterState {
        &self.state
    }

    async fn run_health_check(&mut self) -> &HealthStatus {
        self.state.refresh(&self.probe).await
    }
}

#[cfg(test)]
mod tests;
