use crate::domain::values::confidence::Confidence;
use crate::domain::values::direction::Direction;
use crate::domain::values::provenance::Provenance;
use crate::domain::values::recommendation::Recommendation;
use crate::domain::values::risk_level::RiskLevel;
use serde::{Deserialize, Serialize};

/// Largest absolute target change, in percent.
pub const MAX_TARGET_CHANGE: f64 = 20.0;
pub const MAX_REASONING_CHARS: usize = 500;
pub const MAX_TIMEFRAME_CHARS: usize = 40;
pub const MAX_KEY_FACTORS: usize = 5;
pub const MAX_FACTOR_CHARS: usize = 120;
pub const DEFAULT_TIMEFRAME: &str = "1-2 weeks";

/// Directional call for one symbol. Every constructor runs the values through
/// `normalize`, so a `Prediction` is always complete and in bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub symbol: String,
    pub direction: Direction,
    pub confidence: Confidence,
    pub target_change_pct: f64,
    pub timeframe: String,
    pub reasoning: String,
    pub risk_level: RiskLevel,
    pub key_factors: Vec<String>,
    pub recommendation: Recommendation,
    pub provenance: Provenance,
}

impl Prediction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: &str,
        direction: Direction,
        confidence: f64,
        target_change_pct: f64,
        timeframe: &str,
        reasoning: &str,
        risk_level: RiskLevel,
        key_factors: Vec<String>,
        recommendation: Recommendation,
        provenance: Provenance,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            direction,
            confidence: Confidence::new(confidence),
            target_change_pct,
            timeframe: timeframe.to_string(),
            reasoning: reasoning.to_string(),
            risk_level,
            key_factors,
            recommendation,
            provenance,
        }
        .normalize()
    }

    pub fn with_symbol(mut self, symbol: &str) -> Self {
        self.symbol = symbol.to_string();
        self
    }

    /// Re-applies every bound. Idempotent.
    pub fn normalize(mut self) -> Self {
        self.symbol = self.symbol.trim().to_uppercase();
        self.confidence = Confidence::new(self.confidence.value());
        self.target_change_pct = clamp_target(self.target_change_pct);

        self.timeframe = truncate_chars(self.timeframe.trim(), MAX_TIMEFRAME_CHARS);
        if self.timeframe.is_empty() {
            self.timeframe = DEFAULT_TIMEFRAME.to_string();
        }

        self.reasoning = truncate_chars(self.reasoning.trim(), MAX_REASONING_CHARS);
        if self.reasoning.is_empty() {
            self.reasoning = "No reasoning provided".to_string();
        }

        self.key_factors = self
            .key_factors
            .iter()
            .map(|f| truncate_chars(f.trim(), MAX_FACTOR_CHARS))
            .filter(|f| !f.is_empty())
            .take(MAX_KEY_FACTORS)
            .collect();

        self
    }
}

/// Clamps to ±MAX_TARGET_CHANGE and rounds to two decimals. NaN becomes zero.
pub fn clamp_target(value: f64) -> f64 {
    if !value.is_finite() {
        return if value.is_nan() {
            0.0
        } else {
            value.signum() * MAX_TARGET_CHANGE
        };
    }
    (value.clamp(-MAX_TARGET_CHANGE, MAX_TARGET_CHANGE) * 100.0).round() / 100.0
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
