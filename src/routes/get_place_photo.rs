use crate::types::app_state::AppState;
use axum::{
    body::Body,
    extract::{Query, State},
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
#[cfg(test)]
use axum_macros::debug_handler;
use serde::Deserialize;
use tracing::warn;

#[derive(Deserialize)]
pub struct GetPlacePhotoPayload {
    #[serde(rename = "ref")]
    pub photo_reference: Option<String>,
}

/// Streams a places photo through so the API key never reaches the browser.
/// Every failure is a bare 404.
#[cfg_attr(test, debug_handler)]
pub async fn get_place_photo(
    State(state): State<AppState>,
    Query(GetPlacePhotoPayload { photo_reference }): Query<GetPlacePhotoPayload>,
) -> Response {
    let (Some(places), Some(photo_reference)) = (
        state.places.as_ref(),
        photo_reference.filter(|r| !r.trim().is_empty()),
    ) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let photo = match places.fetch_photo(&photo_reference).await {
        Ok(photo) => photo,
        Err(e) => {
            warn!("Failed to fetch place photo: {}", e);
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    let headers = AppendHeaders([
        ("content-type", photo.content_type),
        ("cache-control", "public, max-age=86400".to_string()),
    ]);

    (headers, Body::from_stream(photo.response.bytes_stream())).into_response()
}
