use thiserror::Error;

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Text generation answered {status}: {body}")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Text generation returned no content")]
    EmptyResponse,
    #[error("Text generation returned invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Text generation returned an unrecognized JSON shape")]
    UnrecognizedShape,
}
