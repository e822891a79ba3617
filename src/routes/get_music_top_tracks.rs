use crate::{
    routes::music_support::music_error,
    services::music::music_service::{TimeRange, TopTrack, DEFAULT_TOP_TRACKS, MAX_TOP_TRACKS},
    types::app_state::AppState,
    utils::{app_error::AppError, validated_query::ValidatedQuery},
};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
#[cfg(test)]
use axum_macros::debug_handler;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Validate, Deserialize)]
pub struct GetMusicTopTracksPayload {
    pub range: Option<String>,
    pub limit: Option<String>,
}

/// Unparseable limits fall back to the default; numeric ones are clamped into range.
fn parse_limit(raw: Option<&str>) -> u8 {
    raw.and_then(|l| l.trim().parse::<i64>().ok())
        .map(|l| l.clamp(1, i64::from(MAX_TOP_TRACKS)) as u8)
        .unwrap_or(DEFAULT_TOP_TRACKS)
}

#[derive(Serialize, Deserialize)]
pub struct GetMusicTopTracksResponse {
    pub tracks: Vec<TopTrack>,
    pub range: TimeRange,
}

#[cfg_attr(test, debug_handler)]
pub async fn get_music_top_tracks(
    State(state): State<AppState>,
    ValidatedQuery(GetMusicTopTracksPayload { range, limit }): ValidatedQuery<
        GetMusicTopTracksPayload,
    >,
) -> Result<Response, AppError> {
    let range = match range.as_deref() {
        None => TimeRange::default(),
        Some(raw) => raw.parse::<TimeRange>().map_err(|_| {
            AppError::bad_request("Invalid range. Use short_term, medium_term, or long_term")
        })?,
    };
    let limit = parse_limit(limit.as_deref());

    let tracks = state
        .music
        .top_tracks(range, limit)
        .await
        .map_err(|e| music_error(e, "Could not fetch top tracks"))?;

    Ok(Json(GetMusicTopTracksResponse { tracks, range }).into_response())
}
