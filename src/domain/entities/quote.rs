use crate::domain::entities::instrument::Instrument;
use crate::domain::values::venue::Venue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest price for one instrument. Never mutated, only replaced by the next
/// refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub venue: Venue,
    pub sector: Option<String>,
    pub price: f64,
    pub volume: u64,
    pub change: f64,
    pub change_pct: f64,
    pub market_cap: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    /// Builds a quote, deriving the deltas from `previous_close` rather than
    /// trusting provider-supplied values.
    pub fn from_close(
        instrument: &Instrument,
        price: f64,
        previous_close: f64,
        volume: u64,
        market_cap: Option<f64>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let change = price - previous_close;
        let change_pct = if previous_close > 0.0 {
            (change / previous_close) * 100.0
        } else {
            0.0
        };

        Self {
            symbol: instrument.symbol.clone(),
            name: instrument.name.clone(),
            venue: instrument.venue,
            sector: instrument.sector.clone(),
            price,
            volume,
            change,
            change_pct,
            market_cap,
            timestamp,
        }
    }
}
