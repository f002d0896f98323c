use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    #[error("Total failure: {0}")]
    TotalFailure(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl DomainError {
    /// Per-unit failures that the pipeline absorbs (omit the instrument, fall
    /// back to the heuristic, keep serving the previous snapshot).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DomainError::InvalidInput(_) | DomainError::Config(_))
    }
}

impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DomainError::Timeout(e.to_string())
        } else if e.status() == Some(reqwest::StatusCode::NOT_FOUND) {
            DomainError::NotFound(e.to_string())
        } else {
            DomainError::Provider(e.to_string())
        }
    }
}
