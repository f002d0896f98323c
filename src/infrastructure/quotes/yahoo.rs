use crate::domain::entities::instrument::Instrument;
use crate::domain::error::DomainError;
use crate::domain::ports::quote_provider::QuoteProvider;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// Yahoo Finance quotes via the v8 chart API (no auth required).
pub struct YahooQuoteProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooQuoteProvider {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url("https://query1.finance.yahoo.com".into(), timeout)
    }

    pub fn with_base_url(base_url: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(
                    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                     AppleWebKit/537.36 (KHTML, like Gecko) \
                     Chrome/120.0.0.0 Safari/537.36",
                )
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, serde::Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, serde::Deserialize)]
struct ChartData {
    meta: ChartMeta,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    regular_market_price: Option<f64>,
    #[serde(default)]
    chart_previous_close: Option<f64>,
    #[serde(default)]
    previous_close: Option<f64>,
    #[serde(default)]
    regular_market_volume: Option<u64>,
    #[serde(default)]
    market_cap: Option<f64>,
}

#[async_trait]
impl QuoteProvider for YahooQuoteProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    async fn fetch(&self, instrument: &Instrument) -> Result<serde_json::Value, DomainError> {
        let ticker = instrument.provider_symbol();
        let url = format!(
            "{}/v8/finance/chart/{ticker}?range=1d&interval=1d",
            self.base_url
        );

        let resp = self.client.get(&url).send().await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DomainError::NotFound(format!("Yahoo has no chart for {ticker}")));
        }
        if !resp.status().is_success() {
            return Err(DomainError::Provider(format!(
                "Yahoo API returned {} for {ticker}",
                resp.status()
            )));
        }

        let data: ChartResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Provider(format!("Yahoo payload for {ticker}: {e}")))?;

        if let Some(err) = data.chart.error {
            return Err(DomainError::NotFound(format!("Yahoo error for {ticker}: {err}")));
        }

        let meta = data
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .map(|d| d.meta)
            .ok_or_else(|| DomainError::NotFound(format!("No chart results for {ticker}")))?;

        Ok(payload_from_meta(&meta))
    }
}

/// Chart metadata in the provider-neutral shape the quote fetcher validates.
/// Missing fields stay null.
fn payload_from_meta(meta: &ChartMeta) -> serde_json::Value {
    json!({
        "price": meta.regular_market_price,
        "previousClose": meta.chart_previous_close.or(meta.previous_close),
        "volume": meta.regular_market_volume,
        "marketCap": meta.market_cap,
    })
}
