//! Lexical news classification pipeline
//!
//! preprocess → classify → extract → summarize, each a pure function over
//! the previous stage's output. [`digest`] runs the whole chain on ingested
//! articles.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Article;

/// Cues that mark a text as positive
pub const POSITIVE_CUES: &[&str] = &["beat", "raise", "growth", "record", "surge", "expand"];

/// Cues that mark a text as negative
pub const NEGATIVE_CUES: &[&str] = &[
    "miss", "cut", "decline", "lawsuit", "drop", "recall", "probe",
];

/// Characters kept in a snippet excerpt
pub const SNIPPET_CHARS: usize = 100;

/// Snippets kept by [`digest`]
pub const DEFAULT_SNIPPETS: usize = 2;

/// Samples kept by [`digest`]
pub const MAX_SAMPLES: usize = 3;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static MONEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s?\d+(?:\.\d+)?").expect("money regex"));

/// Sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Mixed,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Mixed => "mixed",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-label counts; every label is always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub mixed: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentCounts {
    pub fn from_labels(labels: &[Sentiment]) -> Self {
        let mut counts = Self::default();
        for label in labels {
            *counts.slot(*label) += 1;
        }
        counts
    }

    pub fn get(&self, label: Sentiment) -> usize {
        match label {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Mixed => self.mixed,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.mixed + self.positive + self.negative + self.neutral
    }

    fn slot(&mut self, label: Sentiment) -> &mut usize {
        match label {
            Sentiment::Positive => &mut self.positive,
            Sentiment::Negative => &mut self.negative,
            Sentiment::Mixed => &mut self.mixed,
            Sentiment::Neutral => &mut self.neutral,
        }
    }
}

/// Entities found in one text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    pub money: Vec<String>,
}

/// Labelled excerpt of one text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub sentiment: Sentiment,
    pub excerpt: String,
}

impl Snippet {
    /// Bullet line, e.g. `- positive: acme beats estimates...`
    pub fn render(&self) -> String {
        format!("- {}: {}...", self.sentiment, self.excerpt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub summary_text: String,
    pub counts: SentimentCounts,
    pub snippets: Vec<Snippet>,
}

/// One classified text with its entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub text: String,
    pub sentiment: Sentiment,
    pub entities: Entities,
}

/// Output of the full chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsDigest {
    pub counts: SentimentCounts,
    pub samples: Vec<Sample>,
    pub summary: ClassificationSummary,
    pub article_count: usize,
}

/// Collapse whitespace runs, trim, lowercase
pub fn normalize_text(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_lowercase()
}

/// Title, description and content of each article as one normalized string
pub fn preprocess(articles: &[Article]) -> Vec<String> {
    articles
        .iter()
        .map(|a| normalize_text(&format!("{} {} {}", a.title, a.description, a.content)))
        .collect()
}

/// Label a normalized text by cue substrings
pub fn classify(text: &str) -> Sentiment {
    let positive = POSITIVE_CUES.iter().any(|cue| text.contains(cue));
    let negative = NEGATIVE_CUES.iter().any(|cue| text.contains(cue));
    match (positive, negative) {
        (true, true) => Sentiment::Mixed,
        (true, false) => Sentiment::Positive,
        (false, true) => Sentiment::Negative,
        (false, false) => Sentiment::Neutral,
    }
}

pub fn classify_all(texts: &[String]) -> Vec<Sentiment> {
    texts.iter().map(|t| classify(t)).collect()
}

/// Dollar amounts in order of first appearance, without repeats
pub fn extract_money(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in MONEY.find_iter(text) {
        if !found.iter().any(|f| f == m.as_str()) {
            found.push(m.as_str().to_string());
        }
    }
    found
}

pub fn extract(texts: &[String]) -> Vec<Entities> {
    texts
        .iter()
        .map(|t| Entities {
            money: extract_money(t),
        })
        .collect()
}

/// Counts over all labels plus the first `k` texts as snippets.
///
/// `labels` and `texts` are paired by position.
pub fn summarize(labels: &[Sentiment], texts: &[String], k: usize) -> ClassificationSummary {
    let counts = SentimentCounts::from_labels(labels);
    let snippets = labels
        .iter()
        .zip(texts)
        .take(k)
        .map(|(label, text)| Snippet {
            sentiment: *label,
            excerpt: text.chars().take(SNIPPET_CHARS).collect(),
        })
        .collect();

    let summary_text = format!(
        "{} texts: {} positive, {} negative, {} mixed, {} neutral",
        counts.total(),
        counts.positive,
        counts.negative,
        counts.mixed,
        counts.neutral
    );

    ClassificationSummary {
        summary_text,
        counts,
        snippets,
    }
}

/// Run preprocess, classify, extract and summarize over ingested articles
pub fn digest(articles: &[Article]) -> NewsDigest {
    let texts = preprocess(articles);
    let labels = classify_all(&texts);
    let entities = extract(&texts);
    let summary = summarize(&labels, &texts, DEFAULT_SNIPPETS);

    let samples = texts
        .iter()
        .zip(&labels)
        .zip(entities)
        .take(MAX_SAMPLES)
        .map(|((text, sentiment), entities)| Sample {
            text: text.clone(),
            sentiment: *sentiment,
            entities,
        })
        .collect();

    NewsDigest {
        counts: summary.counts,
        samples,
        summary,
        article_count: articles.len(),
    }
}
