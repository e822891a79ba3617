use crate::{
    services::{
        fallback::ProviderOutcome,
        routing::{
            providers::Profile,
            routing_service::{no_route_message, ROUTING_UNAVAILABLE_MESSAGE},
            types::route_response::RouteResponse,
        },
    },
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
pub struct GetRoutePayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing coords"))]
    pub coords: String,

    #[serde(default)]
    pub profile: Profile,
}

/// Parses `lon,lat;lon,lat[;...]`, requiring at least two waypoints.
pub fn parse_waypoints(raw: &str) -> Result<Vec<Coordinate>, AppError> {
    let waypoints = Coordinate::parse_list(raw)
        .map_err(|e| AppError::bad_request(&format!("Invalid coords: {}", e)))?;

    if waypoints.len() < 2 {
        return Err(AppError::bad_request(
            "Invalid coords: at least two waypoints are required",
        ));
    }

    Ok(waypoints)
}

#[cfg_attr(test, debug_handler)]
pub async fn get_route(
    State(state): State<AppState>,
    ValidatedQuery(GetRoutePayload { coords, profile }): ValidatedQuery<GetRoutePayload>,
) -> Result<Response, AppError> {
    let waypoints = parse_waypoints(&coords)?;

    match state.routing.route(&waypoints, profile).await {
        ProviderOutcome::Found(route) => Ok(Json(route).into_response()),
        ProviderOutcome::NotFound => Ok(Json(RouteResponse {
            code: "NoRoute".to_string(),
            routes: Vec::new(),
            message: Some(no_route_message(
                waypoints[0],
                waypoints[waypoints.len() - 1],
            )),
        })
        .into_response()),
        ProviderOutcome::Failed(_) => Err(AppError::unavailable(ROUTING_UNAVAILABLE_MESSAGE)),
    }
}
