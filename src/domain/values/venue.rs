use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exchange an instrument is listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Venue {
    Nse,
    Bse,
}

impl Venue {
    /// Suffix the quote provider expects after the canonical symbol.
    pub fn suffix(&self) -> &'static str {
        match self {
            Venue::Nse => ".NS",
            Venue::Bse => ".BO",
        }
    }

    /// Strips a known venue suffix and upper-cases the remainder.
    pub fn canonical_symbol(raw: &str) -> String {
        let upper = raw.trim().to_uppercase();
        [Venue::Nse, Venue::Bse]
            .iter()
            .find_map(|v| upper.strip_suffix(v.suffix()).map(str::to_string))
            .unwrap_or(upper)
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Venue::Nse => write!(f, "NSE"),
            Venue::Bse => write!(f, "BSE"),
        }
    }
}

impl FromStr for Venue {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nse" => Ok(Venue::Nse),
            "bse" => Ok(Venue::Bse),
            _ => Err(DomainError::InvalidInput(format!(
                "Unknown venue: {s}. Use 'nse' or 'bse'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_symbol_strips_suffix() {
        assert_eq!(Venue::canonical_symbol("reliance.ns"), "RELIANCE");
        assert_eq!(Venue::canonical_symbol("TCS.BO"), "TCS");
        assert_eq!(Venue::canonical_symbol(" INFY "), "INFY");
    }

    #[test]
    fn test_parse_venue() {
        assert_eq!("NSE".parse::<Venue>().unwrap(), Venue::Nse);
        let err = "nyse".parse::<Venue>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert!(!err.is_recoverable());
    }
}
