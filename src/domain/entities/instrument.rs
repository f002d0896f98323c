use crate::domain::values::venue::Venue;
use serde::{Deserialize, Serialize};

/// Static reference data for one tradable symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub name: String,
    pub venue: Venue,
    #[serde(default)]
    pub sector: Option<String>,
}

impl Instrument {
    pub fn new(symbol: &str, name: &str, venue: Venue, sector: Option<&str>) -> Self {
        Self {
            symbol: Venue::canonical_symbol(symbol),
            name: name.to_string(),
            venue,
            sector: sector.map(str::to_string),
        }
    }

    /// Symbol as the quote provider addresses it, e.g. `RELIANCE.NS`.
    pub fn provider_symbol(&self) -> String {
        format!("{}{}", self.symbol, self.venue.suffix())
    }
}
