use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherServiceError {
    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("Unparseable observation time \"{0}\"")]
    Time(String),
}
