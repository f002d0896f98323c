//! Keyword-polarity predictor used when the inference path is unavailable.
//!
//! Pure apart from the injected RNG, and total: any input, including an empty
//! or garbage headline, produces a complete `Prediction`.

use crate::application::text::{find_phrase, normalize};
use crate::config::ReferenceData;
use crate::domain::entities::prediction::{Prediction, DEFAULT_TIMEFRAME};
use crate::domain::values::direction::Direction;
use crate::domain::values::provenance::Provenance;
use crate::domain::values::risk_level::RiskLevel;
use crate::domain::values::sentiment::Sentiment;
use crate::domain::values::venue::Venue;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

pub const DIRECTIONAL_CONFIDENCE: f64 = 60.0;
pub const NEUTRAL_CONFIDENCE: f64 = 35.0;
/// Bounds of the randomized target move for a directional call, in percent.
pub const TARGET_RANGE: (f64, f64) = (1.5, 5.0);

/// Keywords found in a piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordHits {
    pub bullish: Vec<String>,
    pub bearish: Vec<String>,
}

impl KeywordHits {
    pub fn scan(reference: &ReferenceData, text: &str) -> Self {
        let normalized = normalize(text);
        let matching = |words: &[String]| -> Vec<String> {
            words
                .iter()
                .filter(|w| find_phrase(&normalized, w).is_some())
                .cloned()
                .collect()
        };
        Self {
            bullish: matching(&reference.bullish_keywords),
            bearish: matching(&reference.bearish_keywords),
        }
    }

    /// Bullish-only is UP, bearish-only is DOWN, anything else STABLE.
    pub fn direction(&self) -> Direction {
        match (self.bullish.is_empty(), self.bearish.is_empty()) {
            (false, true) => Direction::Up,
            (true, false) => Direction::Down,
            _ => Direction::Stable,
        }
    }

    pub fn sentiment(&self) -> Sentiment {
        match self.direction() {
            Direction::Up => Sentiment::Positive,
            Direction::Down => Sentiment::Negative,
            Direction::Stable => Sentiment::Neutral,
        }
    }
}

pub struct HeuristicPredictor {
    reference: Arc<ReferenceData>,
    rng: Mutex<StdRng>,
}

impl HeuristicPredictor {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self {
            reference,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible target changes for a given seed.
    pub fn with_seed(reference: Arc<ReferenceData>, seed: u64) -> Self {
        Self {
            reference,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn predict(&self, symbol: &str, headline: &str, sentiment: Option<Sentiment>) -> Prediction {
        let symbol = match Venue::canonical_symbol(symbol) {
            s if s.is_empty() => Venue::canonical_symbol(&self.reference.default_symbol),
            s => s,
        };
        let hits = KeywordHits::scan(&self.reference, headline);
        let direction = hits.direction();
        let sector = self.reference.sector_of(&symbol);

        let mut risk = self.reference.risk_for_sector(sector);
        if !hits.bullish.is_empty() && !hits.bearish.is_empty() {
            risk = risk.max(RiskLevel::Medium);
        }

        let (confidence, target) = match direction {
            Direction::Up => (DIRECTIONAL_CONFIDENCE, self.random_target()),
            Direction::Down => (DIRECTIONAL_CONFIDENCE, -self.random_target()),
            Direction::Stable => (NEUTRAL_CONFIDENCE, 0.0),
        };

        let mut reasoning = match direction {
            Direction::Up => format!(
                "Headline carries bullish signals ({}) with no bearish counterweight.",
                hits.bullish.join(", ")
            ),
            Direction::Down => format!(
                "Headline carries bearish signals ({}) with no bullish counterweight.",
                hits.bearish.join(", ")
            ),
            Direction::Stable if hits.bullish.is_empty() && hits.bearish.is_empty() => {
                "No directional keywords in the headline; expecting range-bound trading.".to_string()
            }
            Direction::Stable => format!(
                "Mixed signals: bullish ({}) against bearish ({}).",
                hits.bullish.join(", "),
                hits.bearish.join(", ")
            ),
        };
        match sector {
            Some(sector) => reasoning.push_str(&format!(
                " {symbol} trades in the {sector} sector, a {} risk profile.",
                risk.to_string().to_lowercase()
            )),
            None => reasoning.push_str(&format!(" No sector data for {symbol}.")),
        }
        if let Some(s) = sentiment {
            reasoning.push_str(&format!(" Reported news sentiment is {s}."));
        }

        let mut key_factors = Vec::new();
        if !hits.bullish.is_empty() {
            key_factors.push(format!("Bullish keywords: {}", hits.bullish.join(", ")));
        }
        if !hits.bearish.is_empty() {
            key_factors.push(format!("Bearish keywords: {}", hits.bearish.join(", ")));
        }
        if let Some(sector) = sector {
            key_factors.push(format!("Sector: {sector}"));
        }
        if let Some(s) = sentiment {
            key_factors.push(format!("News sentiment: {s}"));
        }
        key_factors.push("Heuristic estimate; inference service unavailable".to_string());

        Prediction::new(
            &symbol,
            direction,
            confidence,
            target,
            DEFAULT_TIMEFRAME,
            &reasoning,
            risk,
            key_factors,
            direction.implied_recommendation(),
            Provenance::Fallback,
        )
    }

    fn random_target(&self) -> f64 {
        let (lo, hi) = TARGET_RANGE;
        self.rng.lock().random_range(lo..=hi)
    }
}
