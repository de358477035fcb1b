//! Resilient financial data adapters
//!
//! Each adapter fetches one kind of data and never leaves the caller empty
//! handed: when the live source is unavailable it serves deterministic
//! synthetic data, and every result says which one it is.
//!
//! - [`PriceAdapter`]: price history, company info and financial statements
//!   (Yahoo Finance)
//! - [`NewsAdapter`]: news ingest plus the lexical sentiment [`pipeline`]
//!   (NewsAPI)
//! - [`FilingsAdapter`]: latest SEC filings (sec-api.io)
//!
//! # Example
//!
//! ```rust,no_run
//! use findata_adapters::{AdapterConfig, PriceAdapter};
//!
//! #[tokio::main]
//! async fn main() -> findata_core::Result<()> {
//!     let config = AdapterConfig::builder().with_env_credentials().build()?;
//!     let prices = PriceAdapter::new(&config).await?;
//!
//!     let result = prices.fetch_prices("AAPL", "1mo", "1d").await;
//!     println!("{} bars from {}", result.data().len(), result.source());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod filings;
pub mod news;
pub mod price;

pub use config::{AdapterConfig, AdapterConfigBuilder};
pub use filings::{DEFAULT_FORM_TYPES, DEFAULT_LIMIT, Filing, FilingsAdapter};
pub use news::{Article, NewsAdapter, NewsDigest, Sentiment, SentimentCounts, pipeline};
pub use price::{CompanyInfo, PriceAdapter, PriceBar, PriceFrame, StatementTable};

// Re-export the adapter contract for convenience
pub use findata_core::{Adapter, DataOrigin, FetchResult, HealthCheckPolicy, HealthStatus};
