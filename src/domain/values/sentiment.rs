use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentiment label attached to a single news item.
/// Serialized lower-case; parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            _ => Err(format!("Unknown sentiment: {s}")),
        }
    }
}

impl TryFrom<String> for Sentiment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Market-wide outlook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketSentiment {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl From<Sentiment> for MarketSentiment {
    fn from(s: Sentiment) -> Self {
        match s {
            Sentiment::Positive => MarketSentiment::Bullish,
            Sentiment::Negative => MarketSentiment::Bearish,
            Sentiment::Neutral => MarketSentiment::Neutral,
        }
    }
}

impl fmt::Display for MarketSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketSentiment::Bullish => write!(f, "BULLISH"),
            MarketSentiment::Bearish => write!(f, "BEARISH"),
            MarketSentiment::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

impl FromStr for MarketSentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bullish" | "positive" => Ok(MarketSentiment::Bullish),
            "bearish" | "negative" => Ok(MarketSentiment::Bearish),
            "neutral" => Ok(MarketSentiment::Neutral),
            _ => Err(format!("Unknown market sentiment: {s}")),
        }
    }
}
