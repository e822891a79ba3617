use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlacesServiceError {
    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("Places API answered {0}")]
    Provider(String),
}
