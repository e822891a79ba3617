use crate::{routes::music_support::music_error, types::app_state::AppState, utils::app_error::AppError};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
#[cfg(test)]
use axum_macros::debug_handler;

#[cfg_attr(test, debug_handler)]
pub async fn get_music_now_playing(State(state): State<AppState>) -> Result<Response, AppError> {
    let playing = state
        .music
        .now_playing()
        .await
        .map_err(|e| music_error(e, "Could not fetch Spotify data"))?;

    Ok(Json(playing).into_response())
}
