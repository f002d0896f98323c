use crate::domain::error::DomainError;

/// External text-completion service (LLM-style).
///
/// The response is free-form text that is expected, but not guaranteed, to
/// contain the JSON object the prompt asked for.
#[async_trait::async_trait]
pub trait InferenceService: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, DomainError>;
}
