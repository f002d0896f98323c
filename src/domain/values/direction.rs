use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Predicted price direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    #[default]
    Stable,
}

impl Direction {
    /// The recommendation that goes with a direction when none is given.
    pub fn implied_recommendation(&self) -> super::recommendation::Recommendation {
        use super::recommendation::Recommendation;
        match self {
            Direction::Up => Recommendation::Buy,
            Direction::Down => Recommendation::Sell,
            Direction::Stable => Recommendation::Hold,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
            Direction::Stable => write!(f, "STABLE"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "stable" => Ok(Direction::Stable),
            _ => Err(format!("Unknown direction: {s}")),
        }
    }
}
