use crate::{
    services::fallback::ProviderOutcome,
    types::{app_state::AppState, coordinate::Coordinate},
    utils::{app_error::AppError, validated_query::ValidatedQuery},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
#[cfg(test)]
use axum_macros::debug_handler;
use serde::Deserialize;
use tracing::error;
use validator::Validate;

#[derive(Validate, Deserialize)]
pub struct GetGeocodePayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing query"))]
    pub q: String,
}

/// `[lon, lat]` of the best match, or `null` when nothing matched.
#[cfg_attr(test, debug_handler)]
pub async fn get_geocode(
    State(state): State<AppState>,
    ValidatedQuery(GetGeocodePayload { q }): ValidatedQuery<GetGeocodePayload>,
) -> Result<Response, AppError> {
    let query = q.trim();
    if query.is_empty() {
        return Err(AppError::bad_request("Missing query"));
    }

    let found: Option<Coordinate> = match state.geocoding.resolve(query).await {
        ProviderOutcome::Found(c) => Some(c),
        ProviderOutcome::NotFound => None,
        ProviderOutcome::Failed(reason) => {
            error!("Failed to geocode \"{}\": {}", query, reason);
            return Err(AppError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Geocode failed",
            ));
        }
    };

    Ok(Json(found).into_response())
}
