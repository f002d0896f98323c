use crate::domain::entities::instrument::Instrument;
use crate::domain::error::DomainError;

/// Market-data provider port.
///
/// Implementations return the provider payload as loosely-typed JSON with at
/// least `price`, `previousClose` and `volume`, optionally `marketCap`. The
/// quote fetcher validates it; adapters should not compute deltas.
#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, instrument: &Instrument) -> Result<serde_json::Value, DomainError>;
}
