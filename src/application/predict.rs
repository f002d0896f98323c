use crate::application::decoder::decode_prediction;
use crate::application::heuristic::HeuristicPredictor;
use crate::application::inference::InferenceClient;
use crate::application::symbol_resolver::SymbolResolver;
use crate::domain::entities::news_item::NewsItem;
use crate::domain::entities::prediction::Prediction;
use crate::domain::error::DomainError;
use crate::domain::values::sentiment::Sentiment;
use crate::domain::values::venue::Venue;
use futures::future::join_all;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// News item in, one prediction per resolved symbol out.
///
/// Per symbol: one primary attempt (inference + decode) under the client's
/// deadline, then the heuristic if that attempt fails for any reason. The two
/// paths never run concurrently for the same symbol; different symbols of the
/// same item run side by side so the whole call stays within one deadline.
pub struct PredictUseCase {
    resolver: Arc<SymbolResolver>,
    inference: Arc<InferenceClient>,
    heuristic: Arc<HeuristicPredictor>,
    max_symbols: usize,
}

impl PredictUseCase {
    pub fn new(
        resolver: Arc<SymbolResolver>,
        inference: Arc<InferenceClient>,
        heuristic: Arc<HeuristicPredictor>,
        max_symbols: usize,
    ) -> Self {
        Self {
            resolver,
            inference,
            heuristic,
            max_symbols,
        }
    }

    pub async fn execute(&self, item: &NewsItem) -> Vec<Prediction> {
        let resolution = self.resolver.resolve_item(item, self.max_symbols);
        debug!(
            item = %item.id,
            symbols = ?resolution.symbols,
            strategy = ?resolution.strategy,
            "symbols resolved"
        );

        join_all(resolution.symbols.iter().map(|symbol| {
            self.predict_symbol(symbol, &item.headline, item.body.as_deref(), item.sentiment)
        }))
        .await
    }

    /// Single (symbol, headline) prediction. Always returns a complete value.
    pub async fn predict_symbol(
        &self,
        symbol: &str,
        headline: &str,
        content: Option<&str>,
        sentiment: Option<Sentiment>,
    ) -> Prediction {
        let symbol = match Venue::canonical_symbol(symbol) {
            s if s.is_empty() => self.resolver.resolve(headline, &[]),
            s => s,
        };

        match self.try_primary(&symbol, headline, content, sentiment).await {
            Ok(prediction) => {
                info!(%symbol, direction = %prediction.direction, "primary prediction");
                prediction.with_symbol(&symbol).normalize()
            }
            Err(e) => {
                warn!(%symbol, error = %e, "primary prediction failed, using heuristic");
                self.heuristic.predict(&symbol, headline, sentiment)
            }
        }
    }

    async fn try_primary(
        &self,
        symbol: &str,
        headline: &str,
        content: Option<&str>,
        sentiment: Option<Sentiment>,
    ) -> Result<Prediction, DomainError> {
        let deadline = Instant::now() + self.inference.timeout();
        let raw = self.inference.predict(symbol, headline, content, sentiment).await?;

        // Decoding shares the inference deadline.
        let decode = tokio::task::spawn_blocking(move || decode_prediction(&raw));
        match tokio::time::timeout_at(deadline, decode).await {
            Ok(Ok(decoded)) => decoded,
            Ok(Err(e)) => Err(DomainError::DecodeFailure(format!("decoder task failed: {e}"))),
            Err(_) => Err(DomainError::Timeout(format!(
                "decoding {symbol} exceeded the {:?} inference deadline",
                self.inference.timeout()
            ))),
        }
    }
}
