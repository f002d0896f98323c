use crate::application::quote_fetcher::QuoteFetcher;
use crate::domain::entities::instrument::Instrument;
use crate::domain::entities::quote::Quote;
use crate::domain::entities::snapshot::{FetchFailure, Snapshot};
use crate::domain::error::DomainError;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fans a refresh out over the instrument universe with bounded concurrency.
pub struct Aggregator {
    fetcher: QuoteFetcher,
    max_in_flight: usize,
    /// Quotes older than this at snapshot time are dropped.
    max_quote_age: Duration,
}

impl Aggregator {
    pub fn new(fetcher: QuoteFetcher, max_in_flight: usize, max_quote_age: Duration) -> Self {
        Self {
            fetcher,
            max_in_flight: max_in_flight.max(1),
            max_quote_age,
        }
    }

    /// One fetch per instrument, at most `max_in_flight` at a time. Failed
    /// instruments are left out of the snapshot; the refresh only fails when
    /// nothing succeeds.
    pub async fn refresh(&self, instruments: &[Instrument], cycle: u64) -> Result<Snapshot, DomainError> {
        if instruments.is_empty() {
            return Err(DomainError::TotalFailure("no instruments to refresh".into()));
        }

        let fetcher = &self.fetcher;
        let results: Vec<(Instrument, Result<Quote, DomainError>)> = stream::iter(instruments.iter().cloned())
            .map(|instrument| async move {
                let result = fetcher.fetch(&instrument).await;
                (instrument, result)
            })
            .buffer_unordered(self.max_in_flight)
            .collect()
            .await;

        let generated_at = Utc::now();
        let max_age = chrono::Duration::from_std(self.max_quote_age)
            .unwrap_or_else(|_| chrono::Duration::days(365));

        let mut quotes = Vec::with_capacity(results.len());
        let mut failures = Vec::new();

        for (instrument, result) in results {
            match result {
                Ok(quote) if generated_at - quote.timestamp > max_age => {
                    warn!(symbol = %instrument.symbol, cycle, "dropping stale quote");
                    failures.push(FetchFailure {
                        symbol: instrument.symbol.clone(),
                        reason: "quote older than refresh interval".into(),
                    });
                }
                Ok(quote) => quotes.push(quote),
                Err(e) => {
                    debug!(symbol = %instrument.symbol, cycle, error = %e, "omitting instrument");
                    failures.push(FetchFailure {
                        symbol: instrument.symbol.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if quotes.is_empty() {
            warn!(cycle, failed = failures.len(), "every instrument failed to refresh");
            return Err(DomainError::TotalFailure(format!(
                "all {} instruments failed in cycle {cycle}",
                instruments.len()
            )));
        }

        if !failures.is_empty() {
            warn!(cycle, ok = quotes.len(), failed = failures.len(), "partial refresh");
        } else {
            info!(cycle, ok = quotes.len(), "refresh complete");
        }

        Ok(Snapshot::new(cycle, generated_at, quotes, failures))
    }
}
