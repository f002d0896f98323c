use crate::domain::error::DomainError;
use crate::domain::ports::inference_service::InferenceService;

/// Stand-in when no inference backend is configured. Every call fails, so
/// callers go straight to their fallback path.
pub struct NoopInference;

#[async_trait::async_trait]
impl InferenceService for NoopInference {
    fn name(&self) -> &str {
        "noop"
    }

    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, DomainError> {
        Err(DomainError::Provider("no inference service configured".into()))
    }
}
