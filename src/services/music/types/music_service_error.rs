use thiserror::Error;

#[derive(Debug, Error)]
pub enum MusicServiceError {
    #[error("Missing credentials: {}", .0.join(", "))]
    NotConfigured(Vec<&'static str>),
    #[error("Token request rejected: {0}")]
    TokenRejected(String),
    #[error("Token lacks the required scope")]
    InsufficientScope,
    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected status {0}")]
    Status(reqwest::StatusCode),
}
