use crate::domain::entities::instrument::Instrument;
use crate::domain::entities::quote::Quote;
use crate::domain::error::DomainError;
use crate::domain::ports::quote_provider::QuoteProvider;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Fetches one instrument's quote. One provider call, no retries.
pub struct QuoteFetcher {
    provider: Arc<dyn QuoteProvider>,
    timeout: Duration,
}

impl QuoteFetcher {
    pub fn new(provider: Arc<dyn QuoteProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub async fn fetch(&self, instrument: &Instrument) -> Result<Quote, DomainError> {
        let payload = tokio::time::timeout(self.timeout, self.provider.fetch(instrument))
            .await
            .map_err(|_| {
                DomainError::Timeout(format!(
                    "{} did not answer for {} within {:?}",
                    self.provider.name(),
                    instrument.symbol,
                    self.timeout
                ))
            })??;

        decode_payload(instrument, &payload, Utc::now())
    }
}

/// Validates a provider payload and builds a quote from it.
///
/// `price`, `previousClose` and `volume` are required; numbers may arrive as
/// JSON numbers or numeric strings. An unusable `marketCap` is dropped rather
/// than failing the quote.
pub fn decode_payload(
    instrument: &Instrument,
    payload: &Value,
    at: DateTime<Utc>,
) -> Result<Quote, DomainError> {
    let obj = payload.as_object().ok_or_else(|| {
        DomainError::Provider(format!("payload for {} is not an object", instrument.symbol))
    })?;

    let required = |key: &str| -> Result<f64, DomainError> {
        obj.get(key).and_then(as_number).ok_or_else(|| {
            DomainError::Provider(format!("payload for {} missing '{key}'", instrument.symbol))
        })
    };

    let price = required("price")?;
    if price <= 0.0 {
        return Err(DomainError::Provider(format!(
            "non-positive price {price} for {}",
            instrument.symbol
        )));
    }

    let previous_close = required("previousClose")?;
    if previous_close < 0.0 {
        return Err(DomainError::Provider(format!(
            "negative previous close for {}",
            instrument.symbol
        )));
    }

    let volume = required("volume")?;
    if volume < 0.0 {
        return Err(DomainError::Provider(format!(
            "negative volume for {}",
            instrument.symbol
        )));
    }

    let market_cap = obj
        .get("marketCap")
        .and_then(as_number)
        .filter(|m| *m > 0.0);

    Ok(Quote::from_close(
        instrument,
        price,
        previous_close,
        volume.round() as u64,
        market_cap,
        at,
    ))
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
