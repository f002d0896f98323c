use crate::domain::error::DomainError;
use crate::domain::ports::inference_service::InferenceService;
use crate::domain::values::sentiment::Sentiment;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const MAX_CONTENT_CHARS: usize = 1_500;

pub const PREDICTION_SYSTEM_PROMPT: &str = "You are an equity analyst covering Indian markets (NSE and BSE). \
Given one news item and a stock symbol, estimate the short-term price direction. \
Respond with ONLY a JSON object, no prose and no code fences, matching exactly:\n\
{\"symbol\": string, \"prediction\": \"UP\"|\"DOWN\"|\"STABLE\", \"confidence\": number 0-100, \
\"target_price_change\": number (percent, between -20 and 20), \"timeframe\": string, \
\"reasoning\": string (under 80 words), \"risk_level\": \"LOW\"|\"MEDIUM\"|\"HIGH\", \
\"key_factors\": string[] (at most 5), \"recommendation\": \"BUY\"|\"SELL\"|\"HOLD\"}";

pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a market strategist covering Indian equities. \
Given a batch of news headlines with their sentiment, write a market-wide outlook. \
Respond with ONLY a JSON object, no prose and no code fences, matching exactly:\n\
{\"overall_sentiment\": \"BULLISH\"|\"BEARISH\"|\"NEUTRAL\", \"outlook\": string (under 120 words), \
\"key_themes\": string[] (at most 5), \"sector_impacts\": {sector: \"positive\"|\"negative\"|\"neutral\"}, \
\"index_direction\": \"UP\"|\"DOWN\"|\"STABLE\", \"confidence\": number 0-100}";

/// Calls the inference service under a hard deadline. The in-flight call is
/// dropped when the deadline passes; there is no retry.
pub struct InferenceClient {
    service: Arc<dyn InferenceService>,
    timeout: Duration,
}

impl InferenceClient {
    pub fn new(service: Arc<dyn InferenceService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn predict(
        &self,
        symbol: &str,
        headline: &str,
        content: Option<&str>,
        sentiment: Option<Sentiment>,
    ) -> Result<String, DomainError> {
        let prompt = prediction_prompt(symbol, headline, content, sentiment);
        self.complete(PREDICTION_SYSTEM_PROMPT, &prompt).await
    }

    pub async fn summarize(&self, prompt: &str) -> Result<String, DomainError> {
        self.complete(SUMMARY_SYSTEM_PROMPT, prompt).await
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, DomainError> {
        debug!(service = self.service.name(), prompt_chars = prompt.len(), "inference call");
        let text = tokio::time::timeout(self.timeout, self.service.complete(system, prompt))
            .await
            .map_err(|_| {
                DomainError::Timeout(format!(
                    "{} exceeded {:?}",
                    self.service.name(),
                    self.timeout
                ))
            })??;

        if text.trim().is_empty() {
            return Err(DomainError::Provider(format!(
                "{} returned an empty response",
                self.service.name()
            )));
        }
        Ok(text)
    }
}

pub fn prediction_prompt(
    symbol: &str,
    headline: &str,
    content: Option<&str>,
    sentiment: Option<Sentiment>,
) -> String {
    let mut prompt = format!("Symbol: {symbol}\nHeadline: {}\n", headline.trim());
    if let Some(content) = content.map(str::trim).filter(|c| !c.is_empty()) {
        let clipped: String = content.chars().take(MAX_CONTENT_CHARS).collect();
        prompt.push_str(&format!("Content: {clipped}\n"));
    }
    let sentiment = sentiment.map_or_else(|| "unknown".to_string(), |s| s.to_string());
    prompt.push_str(&format!("Sentiment: {sentiment}\n"));
    prompt.push_str("Return the JSON object only.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_prompt_includes_inputs() {
        let prompt = prediction_prompt("TCS", "TCS wins deal", Some("  body  "), Some(Sentiment::Positive));
        assert!(prompt.contains("Symbol: TCS"));
        assert!(prompt.contains("Content: body"));
        assert!(prompt.contains("Sentiment: positive"));
    }

    #[test]
    fn test_prediction_prompt_clips_content() {
        let long = "x".repeat(MAX_CONTENT_CHARS * 2);
        let prompt = prediction_prompt("TCS", "h", Some(&long), None);
        assert!(prompt.len() < MAX_CONTENT_CHARS + 200);
        assert!(prompt.contains("Sentiment: unknown"));
    }
}
