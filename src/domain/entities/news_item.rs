use crate::domain::values::sentiment::Sentiment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default = "new_id")]
    pub id: String,
    pub headline: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default = "unknown_source")]
    pub source: String,
    #[serde(default = "Utc::now")]
    pub published_at: DateTime<Utc>,
    /// Unknown or empty labels read as absent.
    #[serde(default, deserialize_with = "lenient_sentiment")]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub symbols: Vec<String>,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn unknown_source() -> String {
    "unknown".to_string()
}

fn lenient_sentiment<'de, D>(deserializer: D) -> Result<Option<Sentiment>, D::Error>
where
    D: Deserializer<'de>,
{
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label.and_then(|l| l.parse().ok()))
}

impl NewsItem {
    pub fn new(headline: &str, sentiment: Option<Sentiment>) -> Self {
        Self {
            id: new_id(),
            headline: headline.to_string(),
            body: None,
            source: unknown_source(),
            published_at: Utc::now(),
            sentiment,
            symbols: vec![],
        }
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    pub fn with_symbols(mut self, symbols: &[&str]) -> Self {
        self.symbols = symbols.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Headline and body joined, for matching.
    pub fn text(&self) -> String {
        match &self.body {
            Some(body) if !body.trim().is_empty() => format!("{} {}", self.headline, body),
            _ => self.headline.clone(),
        }
    }
}
