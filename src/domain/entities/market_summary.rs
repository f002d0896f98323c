use crate::domain::values::confidence::Confidence;
use crate::domain::values::direction::Direction;
use crate::domain::values::provenance::Provenance;
use crate::domain::values::sentiment::{MarketSentiment, Sentiment};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub const MAX_KEY_THEMES: usize = 5;
pub const MAX_OUTLOOK_CHARS: usize = 600;

/// Market-wide outlook derived from one batch of news. Recomputed per call.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSummary {
    pub overall_sentiment: MarketSentiment,
    pub outlook: String,
    pub key_themes: Vec<String>,
    pub sector_impacts: BTreeMap<String, Sentiment>,
    pub index_direction: Direction,
    pub confidence: Confidence,
    pub provenance: Provenance,
    pub item_count: usize,
    pub generated_at: DateTime<Utc>,
}
