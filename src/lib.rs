pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::aggregator::Aggregator;
use crate::application::heuristic::HeuristicPredictor;
use crate::application::inference::InferenceClient;
use crate::application::predict::PredictUseCase;
use crate::application::quote_fetcher::QuoteFetcher;
use crate::application::scheduler::{Scheduler, SnapshotState};
use crate::application::summarize::SummarizeUseCase;
use crate::application::symbol_resolver::{Resolution, SymbolResolver};
use crate::config::Config;
use crate::domain::entities::market_summary::MarketSummary;
use crate::domain::entities::news_item::NewsItem;
use crate::domain::entities::prediction::Prediction;
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::error::DomainError;
use crate::domain::ports::inference_service::InferenceService;
use crate::domain::ports::quote_provider::QuoteProvider;
use crate::domain::values::sentiment::Sentiment;
use crate::domain::values::venue::Venue;
use crate::infrastructure::inference::noop::NoopInference;
use crate::infrastructure::inference::openai::OpenAiInference;
use crate::infrastructure::quotes::yahoo::YahooQuoteProvider;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

pub struct MarketPulse {
    scheduler: Arc<Scheduler>,
    resolver: Arc<SymbolResolver>,
    predict_uc: PredictUseCase,
    summarize_uc: SummarizeUseCase,
    max_symbols: usize,
}

impl MarketPulse {
    /// Wires the Yahoo quote provider and the configured inference backend.
    pub fn new(config: Config) -> Result<Self, DomainError> {
        config.validate()?;

        let quotes: Arc<dyn QuoteProvider> = Arc::new(YahooQuoteProvider::new(config.fetch_timeout));
        let inference: Arc<dyn InferenceService> = match config.inference.provider.as_str() {
            "openai" => {
                if config.inference.api_key.is_empty() {
                    warn!("openai inference selected without an API key; predictions will fall back");
                }
                Arc::new(OpenAiInference::new(
                    config.inference.api_key.clone(),
                    config.inference.model.clone(),
                    config.inference.base_url.clone(),
                    config.inference_timeout,
                ))
            }
            "noop" | "" => Arc::new(NoopInference),
            other => {
                return Err(DomainError::Config(format!(
                    "unknown inference provider '{other}'. Use 'openai' or 'noop'"
                )))
            }
        };

        Self::with_providers(config, quotes, inference)
    }

    pub fn with_providers(
        config: Config,
        quotes: Arc<dyn QuoteProvider>,
        inference: Arc<dyn InferenceService>,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        let reference = Arc::new(config.reference.clone());

        let aggregator = Aggregator::new(
            QuoteFetcher::new(quotes, config.fetch_timeout),
            config.max_concurrent_fetches,
            config.refresh_interval,
        );
        let scheduler = Arc::new(Scheduler::new(
            aggregator,
            reference.universe.clone(),
            config.refresh_interval,
        ));

        let resolver = Arc::new(SymbolResolver::new(Arc::clone(&reference)));
        let inference = Arc::new(InferenceClient::new(inference, config.inference_timeout));
        let heuristic = Arc::new(match config.seed {
            Some(seed) => HeuristicPredictor::with_seed(Arc::clone(&reference), seed),
            None => HeuristicPredictor::new(Arc::clone(&reference)),
        });

        Ok(Self {
            predict_uc: PredictUseCase::new(
                Arc::clone(&resolver),
                Arc::clone(&inference),
                heuristic,
                config.max_symbols_per_item,
            ),
            summarize_uc: SummarizeUseCase::new(
                inference,
                Arc::clone(&resolver),
                reference,
                config.max_symbols_per_item,
            ),
            scheduler,
            resolver,
            max_symbols: config.max_symbols_per_item,
        })
    }

    /// Last good snapshot, optionally filtered. Never blocks on a refresh.
    pub fn get_snapshot(&self, venue: Option<Venue>, sector: Option<&str>) -> SnapshotState {
        let mut state = self.scheduler.current();
        if venue.is_some() || sector.is_some() {
            state.snapshot = Arc::new(state.snapshot.filtered(venue, sector));
        }
        state
    }

    pub async fn force_refresh(&self) -> Result<Arc<Snapshot>, DomainError> {
        self.scheduler.force_refresh().await
    }

    /// Starts timer-driven refreshes; abort the handle to stop.
    pub fn start_scheduler(&self) -> JoinHandle<()> {
        self.scheduler.spawn()
    }

    pub fn subscribe(&self) -> watch::Receiver<SnapshotState> {
        self.scheduler.subscribe()
    }

    pub async fn predict(&self, item: &NewsItem) -> Vec<Prediction> {
        self.predict_uc.execute(item).await
    }

    pub async fn predict_symbol(
        &self,
        symbol: &str,
        headline: &str,
        sentiment: Option<Sentiment>,
    ) -> Prediction {
        self.predict_uc.predict_symbol(symbol, headline, None, sentiment).await
    }

    pub async fn summarize(&self, items: &[NewsItem]) -> MarketSummary {
        self.summarize_uc.execute(items).await
    }

    pub fn resolve_symbols(&self, text: &str, explicit: &[String]) -> Resolution {
        self.resolver.resolve_all(text, explicit, self.max_symbols)
    }
}
