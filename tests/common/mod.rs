//! Shared test helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use marketpulse::config::Config;
use marketpulse::domain::entities::instrument::Instrument;
use marketpulse::domain::error::DomainError;
use marketpulse::domain::ports::inference_service::InferenceService;
use marketpulse::domain::ports::quote_provider::QuoteProvider;
use marketpulse::domain::values::venue::Venue;
use marketpulse::MarketPulse;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Quote provider driven by the test: prices follow `generation`, listed
/// symbols fail, and calls can be delayed globally or per symbol.
#[derive(Default)]
pub struct ScriptedQuotes {
    pub failing: Mutex<HashSet<String>>,
    pub fail_all: AtomicBool,
    pub delay_ms: AtomicU64,
    pub slow: Mutex<HashMap<String, u64>>,
    pub generation: AtomicU64,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ScriptedQuotes {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail(&self, symbol: &str) {
        self.failing.lock().unwrap().insert(symbol.to_string());
    }

    /// Delay for one symbol, overriding the shared delay.
    pub fn slow_down(&self, symbol: &str, ms: u64) {
        self.slow.lock().unwrap().insert(symbol.to_string(), ms);
    }

    pub fn set_delay(&self, ms: u64) {
        self.delay_ms.store(ms, Ordering::SeqCst);
    }

    pub fn peak_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteProvider for ScriptedQuotes {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self, instrument: &Instrument) -> Result<serde_json::Value, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let generation = self.generation.load(Ordering::SeqCst);
        let delay = self
            .slow
            .lock()
            .unwrap()
            .get(&instrument.symbol)
            .copied()
            .unwrap_or_else(|| self.delay_ms.load(Ordering::SeqCst));
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let failing = self.failing.lock().unwrap().contains(&instrument.symbol);
        if failing || self.fail_all.load(Ordering::SeqCst) {
            return Err(DomainError::Provider(format!("scripted failure for {}", instrument.symbol)));
        }

        let price = 100.0 + generation as f64;
        Ok(json!({
            "price": price,
            "previousClose": 100.0,
            "volume": 1_000,
            "marketCap": null,
        }))
    }
}

/// Inference service that always answers with the same text.
pub struct CannedInference {
    pub response: String,
    pub calls: AtomicUsize,
}

impl CannedInference {
    pub fn new(response: &str) -> Arc<Self> {
        Arc::new(Self {
            response: response.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceService for CannedInference {
    fn name(&self) -> &str {
        "canned"
    }

    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Inference service that never answers.
pub struct HangingInference;

#[async_trait]
impl InferenceService for HangingInference {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, DomainError> {
        std::future::pending().await
    }
}

pub fn instruments(n: usize) -> Vec<Instrument> {
    (0..n)
        .map(|i| Instrument::new(&format!("SYM{i}"), &format!("Company {i}"), Venue::Nse, Some("IT")))
        .collect()
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.refresh_interval = Duration::from_secs(60);
    config.fetch_timeout = Duration::from_millis(500);
    config.inference_timeout = Duration::from_millis(200);
    config.max_concurrent_fetches = 4;
    config.seed = Some(42);
    config
}

pub fn setup(quotes: Arc<dyn QuoteProvider>, inference: Arc<dyn InferenceService>) -> MarketPulse {
    MarketPulse::with_providers(test_config(), quotes, inference).unwrap()
}

pub fn setup_with(
    config: Config,
    quotes: Arc<dyn QuoteProvider>,
    inference: Arc<dyn InferenceService>,
) -> MarketPulse {
    MarketPulse::with_providers(config, quotes, inference).unwrap()
}
