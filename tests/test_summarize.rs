mod common;

use common::{setup, CannedInference, HangingInference, ScriptedQuotes};
use marketpulse::domain::entities::news_item::NewsItem;
use marketpulse::domain::values::direction::Direction;
use marketpulse::domain::values::provenance::Provenance;
use marketpulse::domain::values::sentiment::{MarketSentiment, Sentiment};
use marketpulse::infrastructure::inference::noop::NoopInference;
use std::sync::Arc;

fn batch() -> Vec<NewsItem> {
    vec![
        NewsItem::new("Infosys wins large deal", Some(Sentiment::Positive)),
        NewsItem::new("TCS signs multi-year contract", Some(Sentiment::Positive)).with_symbols(&["TCS"]),
        NewsItem::new("Tata Steel output falls", Some(Sentiment::Negative)),
    ]
}

#[tokio::test]
async fn test_summarize_primary() {
    let raw = r#"Here you go: {"overall_sentiment":"BULLISH","outlook":"IT leads a broad rally.",
        "key_themes":["IT deal wins","Metals weakness"],
        "sector_impacts":{"IT":"positive","Metals":"negative"},
        "index_direction":"UP","confidence":72}"#;
    let inference = CannedInference::new(raw);
    let mp = setup(ScriptedQuotes::new(), Arc::clone(&inference) as _);

    let summary = mp.summarize(&batch()).await;

    assert_eq!(inference.call_count(), 1);
    assert_eq!(summary.provenance, Provenance::Primary);
    assert_eq!(summary.overall_sentiment, MarketSentiment::Bullish);
    assert_eq!(summary.index_direction, Direction::Up);
    assert_eq!(summary.confidence.value(), 72.0);
    assert_eq!(summary.key_themes.len(), 2);
    assert_eq!(summary.sector_impacts.get("Metals"), Some(&Sentiment::Negative));
    assert_eq!(summary.item_count, 3);
}

#[tokio::test]
async fn test_summarize_falls_back_to_vote() {
    let mp = setup(ScriptedQuotes::new(), Arc::new(NoopInference));

    let summary = mp.summarize(&batch()).await;

    assert_eq!(summary.provenance, Provenance::Fallback);
    assert_eq!(summary.overall_sentiment, MarketSentiment::Bullish);
    assert_eq!(summary.index_direction, Direction::Up);
    assert!(summary.confidence.value() >= 20.0 && summary.confidence.value() <= 50.0);
    assert_eq!(summary.sector_impacts.get("IT"), Some(&Sentiment::Positive));
    assert_eq!(summary.sector_impacts.get("Metals"), Some(&Sentiment::Negative));
    assert!(summary.key_themes.contains(&"IT (2 stories)".to_string()));
    assert_eq!(summary.item_count, 3);
}

#[tokio::test]
async fn test_summarize_timeout_falls_back() {
    let mp = setup(ScriptedQuotes::new(), Arc::new(HangingInference));
    let summary = mp.summarize(&batch()).await;
    assert_eq!(summary.provenance, Provenance::Fallback);
}

#[tokio::test]
async fn test_tie_is_neutral() {
    let mp = setup(ScriptedQuotes::new(), Arc::new(NoopInference));
    let items = vec![
        NewsItem::new("Wipro beats estimates", Some(Sentiment::Positive)),
        NewsItem::new("Cipla recalls batch", Some(Sentiment::Negative)),
    ];

    let summary = mp.summarize(&items).await;
    assert_eq!(summary.overall_sentiment, MarketSentiment::Neutral);
    assert_eq!(summary.index_direction, Direction::Stable);
}

#[tokio::test]
async fn test_missing_sentiment_uses_keywords() {
    let mp = setup(ScriptedQuotes::new(), Arc::new(NoopInference));
    let items = vec![
        NewsItem::new("Adani stocks plunge on probe", None),
        NewsItem::new("Yes Bank slump deepens", None),
    ];

    let summary = mp.summarize(&items).await;
    assert_eq!(summary.overall_sentiment, MarketSentiment::Bearish);
    assert_eq!(summary.index_direction, Direction::Down);
}

#[tokio::test]
async fn test_empty_batch_skips_inference() {
    let inference = CannedInference::new(r#"{"overall_sentiment":"BULLISH"}"#);
    let mp = setup(ScriptedQuotes::new(), Arc::clone(&inference) as _);

    let summary = mp.summarize(&[]).await;

    assert_eq!(inference.call_count(), 0);
    assert_eq!(summary.overall_sentiment, MarketSentiment::Neutral);
    assert_eq!(summary.provenance, Provenance::Fallback);
    assert_eq!(summary.item_count, 0);
    assert!(summary.key_themes.is_empty());
}

#[tokio::test]
async fn test_fractional_summary_confidence_is_scaled() {
    let raw = r#"{"overall_sentiment":"BEARISH","outlook":"Metals drag.","confidence":0.72}"#;
    let mp = setup(ScriptedQuotes::new(), CannedInference::new(raw));

    let summary = mp.summarize(&batch()).await;
    assert_eq!(summary.provenance, Provenance::Primary);
    assert_eq!(summary.overall_sentiment, MarketSentiment::Bearish);
    assert_eq!(summary.confidence.value(), 72.0);
}

#[tokio::test]
async fn test_oversized_summary_reply_falls_back_quickly() {
    let flood = "{\"a\":".repeat(40_000) + "1";
    let mp = setup(ScriptedQuotes::new(), CannedInference::new(&flood));

    let started = std::time::Instant::now();
    let summary = mp.summarize(&batch()).await;
    assert_eq!(summary.provenance, Provenance::Fallback);
    assert!(started.elapsed() < std::time::Duration::from_secs(1));
}

#[tokio::test]
async fn test_capitalized_sentiment_labels_parse() {
    let raw = r#"[{"headline":"Infosys wins large deal","sentiment":"Positive"},
                  {"headline":"TCS signs contract","sentiment":"POSITIVE"},
                  {"headline":"Tata Steel output falls","sentiment":"Negative"}]"#;
    let items: Vec<NewsItem> = serde_json::from_str(raw).unwrap();
    let mp = setup(ScriptedQuotes::new(), Arc::new(NoopInference));

    let summary = mp.summarize(&items).await;
    assert_eq!(summary.overall_sentiment, MarketSentiment::Bullish);
}
