use crate::application::decoder::{as_percent, enum_field, find_object, number_field, string_field, string_list_field};
use crate::application::heuristic::KeywordHits;
use crate::application::inference::InferenceClient;
use crate::application::symbol_resolver::SymbolResolver;
use crate::config::ReferenceData;
use crate::domain::entities::market_summary::{MarketSummary, MAX_KEY_THEMES, MAX_OUTLOOK_CHARS};
use crate::domain::entities::news_item::NewsItem;
use crate::domain::error::DomainError;
use crate::domain::values::confidence::Confidence;
use crate::domain::values::direction::Direction;
use crate::domain::values::provenance::Provenance;
use crate::domain::values::sentiment::{MarketSentiment, Sentiment};
use chrono::Utc;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{info, warn};

/// Items beyond this are left out of the inference prompt (the fallback vote
/// still counts them).
const MAX_PROMPT_ITEMS: usize = 25;
const FALLBACK_MIN_CONFIDENCE: f64 = 20.0;
const FALLBACK_MAX_CONFIDENCE: f64 = 50.0;

pub struct SummarizeUseCase {
    inference: Arc<InferenceClient>,
    resolver: Arc<SymbolResolver>,
    reference: Arc<ReferenceData>,
    max_symbols: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Tally {
    positive: usize,
    negative: usize,
    neutral: usize,
}

impl Tally {
    fn add(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Plurality winner; any tie for first place is neutral.
    fn winner(&self) -> Sentiment {
        if self.positive > self.negative && self.positive > self.neutral {
            Sentiment::Positive
        } else if self.negative > self.positive && self.negative > self.neutral {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    fn share(&self, sentiment: Sentiment) -> f64 {
        let count = match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        };
        if self.total() == 0 {
            0.0
        } else {
            count as f64 / self.total() as f64
        }
    }
}

impl SummarizeUseCase {
    pub fn new(
        inference: Arc<InferenceClient>,
        resolver: Arc<SymbolResolver>,
        reference: Arc<ReferenceData>,
        max_symbols: usize,
    ) -> Self {
        Self {
            inference,
            resolver,
            reference,
            max_symbols,
        }
    }

    /// One inference call for the batch; a local majority vote if it fails.
    /// An empty batch skips the call and yields a neutral summary.
    pub async fn execute(&self, items: &[NewsItem]) -> MarketSummary {
        if items.is_empty() {
            return self.fallback(items);
        }

        match self.try_primary(items).await {
            Ok(summary) => {
                info!(items = items.len(), sentiment = %summary.overall_sentiment, "primary market summary");
                summary
            }
            Err(e) => {
                warn!(items = items.len(), error = %e, "market summary inference failed, using vote");
                self.fallback(items)
            }
        }
    }

    async fn try_primary(&self, items: &[NewsItem]) -> Result<MarketSummary, DomainError> {
        let deadline = Instant::now() + self.inference.timeout();
        let raw = self.inference.summarize(&self.summary_prompt(items)).await?;

        // Decoding shares the inference deadline.
        let decode = tokio::task::spawn_blocking(move || {
            find_object(&raw, |obj| {
                obj.contains_key("overall_sentiment") || obj.contains_key("outlook")
            })
        });
        let obj = match tokio::time::timeout_at(deadline, decode).await {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                return Err(DomainError::DecodeFailure(format!("decoder task failed: {e}")))
            }
            Err(_) => {
                return Err(DomainError::Timeout(
                    "decoding the market summary exceeded the inference deadline".into(),
                ))
            }
        }
        .ok_or_else(|| DomainError::DecodeFailure("no summary object in inference output".into()))?;

        let overall: MarketSentiment = enum_field(&obj, &["overall_sentiment", "sentiment"]).unwrap_or_default();
        let index_direction = enum_field(&obj, &["index_direction", "nifty_outlook"])
            .unwrap_or_else(|| direction_for(overall));

        let sector_impacts = match obj.get("sector_impacts") {
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(sector, impact)| {
                    let impact = impact.as_str()?.parse::<MarketSentiment>().ok()?;
                    Some((sector.trim().to_string(), sentiment_for(impact)))
                })
                .filter(|(sector, _)| !sector.is_empty())
                .collect(),
            _ => BTreeMap::new(),
        };

        Ok(MarketSummary {
            overall_sentiment: overall,
            outlook: clip(
                &string_field(&obj, &["outlook"]).unwrap_or_else(|| "No outlook provided".into()),
                MAX_OUTLOOK_CHARS,
            ),
            key_themes: string_list_field(&obj, &["key_themes", "themes"])
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .take(MAX_KEY_THEMES)
                .collect(),
            sector_impacts,
            index_direction,
            confidence: Confidence::new(number_field(&obj, &["confidence"]).map(as_percent).unwrap_or(50.0)),
            provenance: Provenance::Primary,
            item_count: items.len(),
            generated_at: Utc::now(),
        })
    }

    fn summary_prompt(&self, items: &[NewsItem]) -> String {
        let mut prompt = format!("{} news items:\n", items.len());
        for item in items.iter().take(MAX_PROMPT_ITEMS) {
            let sentiment = self.item_sentiment(item);
            let symbols = self.resolver.resolve_item(item, self.max_symbols).symbols;
            prompt.push_str(&format!(
                "- [{sentiment}] {} ({})\n",
                item.headline.trim(),
                symbols.join(", ")
            ));
        }
        if items.len() > MAX_PROMPT_ITEMS {
            prompt.push_str(&format!("... and {} more\n", items.len() - MAX_PROMPT_ITEMS));
        }
        prompt.push_str("Return the JSON object only.");
        prompt
    }

    /// Supplied sentiment, or keyword polarity of the text when absent.
    fn item_sentiment(&self, item: &NewsItem) -> Sentiment {
        item.sentiment
            .unwrap_or_else(|| KeywordHits::scan(&self.reference, &item.text()).sentiment())
    }

    fn fallback(&self, items: &[NewsItem]) -> MarketSummary {
        let mut overall = Tally::default();
        let mut by_sector: HashMap<String, Tally> = HashMap::new();

        for item in items {
            let sentiment = self.item_sentiment(item);
            overall.add(sentiment);

            let mut sectors: Vec<&str> = self
                .resolver
                .resolve_item(item, self.max_symbols)
                .symbols
                .iter()
                .filter_map(|s| self.reference.sector_of(s))
                .collect();
            sectors.sort_unstable();
            sectors.dedup();
            for sector in sectors {
                by_sector.entry(sector.to_string()).or_default().add(sentiment);
            }
        }

        let winner = overall.winner();
        let overall_sentiment = MarketSentiment::from(winner);

        let mut themes: Vec<(&String, usize)> = by_sector.iter().map(|(s, t)| (s, t.total())).collect();
        themes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let key_themes = themes
            .into_iter()
            .take(MAX_KEY_THEMES)
            .map(|(sector, count)| format!("{sector} ({count} stories)"))
            .collect();

        let sector_impacts = by_sector
            .iter()
            .map(|(sector, tally)| (sector.clone(), tally.winner()))
            .collect();

        let confidence = if items.is_empty() {
            FALLBACK_MIN_CONFIDENCE
        } else {
            (overall.share(winner) * FALLBACK_MAX_CONFIDENCE)
                .clamp(FALLBACK_MIN_CONFIDENCE, FALLBACK_MAX_CONFIDENCE)
        };

        let outlook = if items.is_empty() {
            "No news items to summarize; outlook is neutral.".to_string()
        } else {
            format!(
                "Vote across {} news items: {} positive, {} negative, {} neutral. \
                 Overall tone is {}. Low-confidence outlook computed without the inference service.",
                overall.total(),
                overall.positive,
                overall.negative,
                overall.neutral,
                overall_sentiment.to_string().to_lowercase()
            )
        };

        MarketSummary {
            overall_sentiment,
            outlook,
            key_themes,
            sector_impacts,
            index_direction: direction_for(overall_sentiment),
            confidence: Confidence::new(confidence),
            provenance: Provenance::Fallback,
            item_count: items.len(),
            generated_at: Utc::now(),
        }
    }
}

fn direction_for(sentiment: MarketSentiment) -> Direction {
    match sentiment {
        MarketSentiment::Bullish => Direction::Up,
        MarketSentiment::Bearish => Direction::Down,
        MarketSentiment::Neutral => Direction::Stable,
    }
}

fn sentiment_for(impact: MarketSentiment) -> Sentiment {
    match impact {
        MarketSentiment::Bullish => Sentiment::Positive,
        MarketSentiment::Bearish => Sentiment::Negative,
        MarketSentiment::Neutral => Sentiment::Neutral,
    }
}

fn clip(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
