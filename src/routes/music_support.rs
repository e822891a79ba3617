use axum::http::{header::HOST, HeaderMap, StatusCode};
use tracing::error;

use crate::{
    services::music::types::music_service_error::MusicServiceError, utils::app_error::AppError,
};

pub const CALLBACK_PATH: &str = "/api/music/callback";

/// Where Spotify sends the user back to. `APP_URL` wins; otherwise the
/// request host, with `localhost` rewritten since Spotify rejects it.
pub fn redirect_uri(app_url: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(base) = app_url {
        return format!("{}{}", base.trim_end_matches('/'), CALLBACK_PATH);
    }

    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("127.0.0.1:3000");
    let host = match host.strip_prefix("localhost") {
        Some(rest) => format!("127.0.0.1{}", rest),
        None => host.to_string(),
    };

    format!("http://{}{}", host, CALLBACK_PATH)
}

/// Maps a music failure to a response; `failure` is the message for
/// transport and upstream errors.
pub fn music_error(e: MusicServiceError, failure: &str) -> AppError {
    match e {
        MusicServiceError::NotConfigured(missing) => AppError::unavailable(&format!(
            "Spotify not configured. Missing: {}. Add them, then visit /api/music/auth to get a refresh token.",
            missing.join(", ")
        )),
        MusicServiceError::TokenRejected(_) => AppError::unavailable(
            "Spotify auth failed. Re-run /api/music/auth to get a new refresh token.",
        ),
        MusicServiceError::InsufficientScope => AppError::unavailable(
            "Need user-top-read scope. Visit /api/music/auth to re-authorize.",
        ),
        e @ (MusicServiceError::Request(_) | MusicServiceError::Status(_)) => {
            error!("Spotify API error: {}", e);
            AppError::new(StatusCode::INTERNAL_SERVER_ERROR, failure)
        }
    }
}
