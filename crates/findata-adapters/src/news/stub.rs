//! Synthetic news articles

use chrono::{Duration, Utc};
use findata_core::StubGenerator;

use super::Article;

/// Two fixed articles per ticker: one with a positive cue, one with a
/// negative cue
#[derive(Debug, Clone, Copy, Default)]
pub struct StubArticles;

impl StubGenerator<str> for StubArticles {
    type Output = Vec<Article>;

    fn generate(&self, ticker: &str, _reason: Option<&str>) -> Vec<Article> {
        let now = Utc::now();
        vec![
            Article {
                title: format!("[Stub] Growth story for {ticker}"),
                description: format!("{ticker} gains as services growth improves"),
                content: "...".to_string(),
                published_at: now.to_rfc3339(),
            },
            Article {
                title: format!("[Stub] Miss story for {ticker}"),
                description: format!("{ticker} faces supply chain miss and margin pressure"),
                content: "...".to_string(),
                published_at: (now - Duration::hours(1)).to_rfc3339(),
            },
        ]
    }
}
