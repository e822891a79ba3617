use crate::{
    types::{app_state::AppState, coordinate::Coordinate},
    utils::{app_error::AppError, validated_query::ValidatedQuery},
};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
#[cfg(test)]
use axum_macros::debug_handler;
use serde::Deserialize;
use validator::Validate;

#[derive(Validate, Deserialize)]
pub struct GetWeatherPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing coords"))]
    pub coords: String,
}

/// Current conditions per point, `null` where the lookup failed.
#[cfg_attr(test, debug_handler)]
pub async fn get_weather(
    State(state): State<AppState>,
    ValidatedQuery(GetWeatherPayload { coords }): ValidatedQuery<GetWeatherPayload>,
) -> Result<Response, AppError> {
    let points = Coordinate::parse_list(&coords)
        .map_err(|e| AppError::bad_request(&format!("Invalid coords: {}", e)))?;

    if points.is_empty() {
        return Err(AppError::bad_request("Missing coords"));
    }

    Ok(Json(state.weather.current_many(&points).await).into_response())
}
