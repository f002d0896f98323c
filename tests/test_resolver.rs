mod common;

use common::{setup, ScriptedQuotes};
use marketpulse::application::symbol_resolver::ResolutionStrategy;
use marketpulse::infrastructure::inference::noop::NoopInference;
use marketpulse::MarketPulse;
use std::sync::Arc;

fn mp() -> MarketPulse {
    setup(ScriptedQuotes::new(), Arc::new(NoopInference))
}

#[tokio::test]
async fn test_sector_keyword_falls_through_to_proxy() {
    let r = mp().resolve_symbols("Banking sector under pressure amid rate concerns", &[]);
    assert_eq!(r.strategy, ResolutionStrategy::SectorProxy);
    assert_eq!(r.symbols, vec!["HDFCBANK"]);
}

#[tokio::test]
async fn test_explicit_symbols_win() {
    let r = mp().resolve_symbols("Reliance shares jump", &["infy.ns".to_string()]);
    assert_eq!(r.strategy, ResolutionStrategy::Explicit);
    assert_eq!(r.symbols, vec!["INFY"]);
}

#[tokio::test]
async fn test_company_name_beats_tokens() {
    let r = mp().resolve_symbols("HDFC Bank and ICICI post strong loan growth", &[]);
    assert_eq!(r.strategy, ResolutionStrategy::CompanyName);
    assert_eq!(r.symbols, vec!["HDFCBANK", "ICICIBANK"]);
}

#[tokio::test]
async fn test_company_names_are_whole_words() {
    // "itc" inside "switch" is not a mention of ITC
    let r = mp().resolve_symbols("Investors switch to defensive names", &[]);
    assert_ne!(r.symbols, vec!["ITC"]);
}

#[tokio::test]
async fn test_uppercase_tokens_skip_stop_words() {
    let r = mp().resolve_symbols("BREAKING: ZOMATO shares rally after SEBI nod", &[]);
    assert_eq!(r.strategy, ResolutionStrategy::Token);
    assert_eq!(r.symbols, vec!["ZOMATO"]);
}

#[tokio::test]
async fn test_default_index_when_nothing_matches() {
    let r = mp().resolve_symbols("Markets were quiet today", &[]);
    assert_eq!(r.strategy, ResolutionStrategy::Default);
    assert_eq!(r.symbols, vec!["NIFTY"]);
}

#[tokio::test]
async fn test_duplicates_collapse() {
    let r = mp().resolve_symbols("HDFC Bank results: hdfc bank beats, HDFC rallies", &[]);
    assert_eq!(r.symbols, vec!["HDFCBANK"]);
}

#[tokio::test]
async fn test_empty_text_resolves_to_default() {
    let r = mp().resolve_symbols("", &[]);
    assert_eq!(r.symbols, vec!["NIFTY"]);
}
