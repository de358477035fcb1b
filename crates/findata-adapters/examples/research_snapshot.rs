//! Research snapshot example
//!
//! Pulls prices, company info, news sentiment and filings for one ticker and
//! prints where each piece came from. Missing API keys are fine: the news and
//! filings adapters fall back to stub data.
//!
//! To run this example:
//! ```bash
//! # Optional keys
//! export NEWSAPI_KEY=your_key_here
//! export SEC_API_KEY=your_key_here
//!
//! # JSON logs instead of human readable ones
//! export FINDATA_LOG_JSON=1
//!
//! cargo run --example research_snapshot MSFT
//! ```

use std::env;

use findata_adapters::{
    Adapter, AdapterConfig, FilingsAdapter, HealthCheckPolicy, NewsAdapter, PriceAdapter,
    news::DEFAULT_WINDOW_DAYS,
};
use findata_utils::{LogConfig, init_tracing_with};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut log_config = LogConfig::from_env();
    if findata_utils::env_secret("FINDATA_LOG_JSON").is_some() {
        log_config = log_config.json();
    }
    init_tracing_with(&log_config)?;

    let ticker = env::args().nth(1).unwrap_or_else(|| "AAPL".to_string());

    let config = AdapterConfig::builder()
        .with_env_credentials()
        .health_check(HealthCheckPolicy::report_only())
        .build()?;

    println!("=== Research snapshot: {ticker} ===\n");

    let prices = PriceAdapter::new(&config).await?;
    let news = NewsAdapter::new(&config).await?;
    let filings = FilingsAdapter::new(&config).await?;

    println!("Health:");
    for adapter in [&prices as &dyn Adapter, &news, &filings] {
        let status = adapter.health_status();
        println!(
            "  - {:<15} healthy={:<5} stub_mode={:<5} {}",
            adapter.name(),
            status.healthy,
            status.stub_mode,
            status.message
        );
    }

    let history = prices.fetch_prices(&ticker, "1mo", "1d").await;
    println!("\nPrices ({}):", history.source());
    if let Some(reason) = history.stub_reason() {
        println!("  stub reason: {reason}");
    }
    println!(
        "  {} bars, last close {:.2}",
        history.data().len(),
        history.data().last_close().unwrap_or_default()
    );

    let info = prices.fetch_info(&ticker).await;
    println!("\nCompany info ({}): {} fields", info.source(), info.data().len());
    for key in ["longName", "sector", "industry", "marketCap"] {
        if let Some(value) = info.data().get(key) {
            println!("  {key}: {value}");
        }
    }

    let digest = news.run_chain(&ticker, DEFAULT_WINDOW_DAYS).await;
    println!("\nNews ({}):", digest.source());
    println!("  {}", digest.data().summary.summary_text);
    for snippet in &digest.data().summary.snippets {
        println!("  {}", snippet.render());
    }

    let recent = filings.latest_filings_default(&ticker).await;
    println!("\nFilings ({}):", recent.source());
    for filing in recent.data() {
        println!("  {} {} {}", filing.filing_date, filing.form, filing.text);
    }

    println!("\nAs JSON:\n{}", serde_json::to_string_pretty(&digest)?);

    Ok(())
}
