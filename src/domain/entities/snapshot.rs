use crate::domain::entities::quote::Quote;
use crate::domain::values::venue::Venue;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

/// Every quote that survived one refresh cycle. Built once by the aggregator
/// and shared behind an `Arc`; nothing mutates it after publication.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub id: String,
    pub cycle: u64,
    pub generated_at: DateTime<Utc>,
    pub quotes: Vec<Quote>,
    /// Instruments omitted from this cycle and why.
    pub failures: Vec<FetchFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    pub symbol: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breadth {
    pub advancers: usize,
    pub decliners: usize,
    pub unchanged: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Movers {
    pub gainers: Vec<Quote>,
    pub losers: Vec<Quote>,
}

impl Snapshot {
    pub fn new(cycle: u64, generated_at: DateTime<Utc>, quotes: Vec<Quote>, failures: Vec<FetchFailure>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            cycle,
            generated_at,
            quotes,
            failures,
        }
    }

    /// Placeholder served before the first successful refresh.
    pub fn empty() -> Self {
        Self::new(0, Utc::now(), vec![], vec![])
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&Quote> {
        let symbol = Venue::canonical_symbol(symbol);
        self.quotes.iter().find(|q| q.symbol == symbol)
    }

    pub fn by_venue(&self, venue: Venue) -> Vec<&Quote> {
        self.quotes.iter().filter(|q| q.venue == venue).collect()
    }

    /// Case-insensitive sector match. Quotes without a sector never match.
    pub fn by_sector(&self, sector: &str) -> Vec<&Quote> {
        self.quotes
            .iter()
            .filter(|q| {
                q.sector
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case(sector.trim()))
            })
            .collect()
    }

    /// A copy restricted to the given filters, keeping this snapshot's identity.
    pub fn filtered(&self, venue: Option<Venue>, sector: Option<&str>) -> Snapshot {
        let quotes = self
            .quotes
            .iter()
            .filter(|q| venue.map_or(true, |v| q.venue == v))
            .filter(|q| {
                sector.map_or(true, |s| {
                    q.sector
                        .as_deref()
                        .is_some_and(|qs| qs.eq_ignore_ascii_case(s.trim()))
                })
            })
            .cloned()
            .collect();

        Snapshot {
            id: self.id.clone(),
            cycle: self.cycle,
            generated_at: self.generated_at,
            quotes,
            failures: self.failures.clone(),
        }
    }

    pub fn sectors(&self) -> Vec<String> {
        self.quotes
            .iter()
            .filter_map(|q| q.sector.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn breadth(&self) -> Breadth {
        let mut breadth = Breadth {
            advancers: 0,
            decliners: 0,
            unchanged: 0,
        };
        for q in &self.quotes {
            if q.change > 0.0 {
                breadth.advancers += 1;
            } else if q.change < 0.0 {
                breadth.decliners += 1;
            } else {
                breadth.unchanged += 1;
            }
        }
        breadth
    }

    /// Top `n` gainers and losers by percent change. A quote appears in at most
    /// one list.
    pub fn top_movers(&self, n: usize) -> Movers {
        let mut sorted: Vec<&Quote> = self.quotes.iter().collect();
        sorted.sort_by(|a, b| {
            b.change_pct
                .partial_cmp(&a.change_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });

        let gainers: Vec<Quote> = sorted
            .iter()
            .filter(|q| q.change_pct > 0.0)
            .take(n)
            .map(|q| (*q).clone())
            .collect();
        let losers: Vec<Quote> = sorted
            .iter()
            .rev()
            .filter(|q| q.change_pct < 0.0)
            .take(n)
            .map(|q| (*q).clone())
            .collect();

        Movers { gainers, losers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::instrument::Instrument;

    fn quote(symbol: &str, venue: Venue, sector: Option<&str>, price: f64, prev: f64) -> Quote {
        let inst = Instrument::new(symbol, symbol, venue, sector);
        Quote::from_close(&inst, price, prev, 100, None, Utc::now())
    }

    fn sample() -> Snapshot {
        Snapshot::new(
            3,
            Utc::now(),
            vec![
                quote("HDFCBANK", Venue::Nse, Some("Banking"), 105.0, 100.0),
                quote("ICICIBANK", Venue::Nse, Some("Banking"), 95.0, 100.0),
                quote("TCS", Venue::Bse, Some("IT"), 100.0, 100.0),
                quote("INFY", Venue::Nse, Some("IT"), 110.0, 100.0),
            ],
            vec![],
        )
    }

    #[test]
    fn test_venue_and_sector_views() {
        let snap = sample();
        assert_eq!(snap.by_venue(Venue::Nse).len(), 3);
        assert_eq!(snap.by_venue(Venue::Bse).len(), 1);
        assert_eq!(snap.by_sector("banking").len(), 2);
        assert!(snap.by_sector("Pharma").is_empty());
    }

    #[test]
    fn test_filtered_keeps_identity() {
        let snap = sample();
        let it = snap.filtered(Some(Venue::Nse), Some("IT"));
        assert_eq!(it.id, snap.id);
        assert_eq!(it.cycle, 3);
        assert_eq!(it.len(), 1);
        assert_eq!(it.quotes[0].symbol, "INFY");
    }

    #[test]
    fn test_breadth_and_movers() {
        let snap = sample();
        assert_eq!(
            snap.breadth(),
            Breadth {
                advancers: 2,
                decliners: 1,
                unchanged: 1
            }
        );
        let movers = snap.top_movers(1);
        assert_eq!(movers.gainers[0].symbol, "INFY");
        assert_eq!(movers.losers[0].symbol, "ICICIBANK");
        assert_eq!(snap.sectors(), vec!["Banking".to_string(), "IT".to_string()]);
    }
}
