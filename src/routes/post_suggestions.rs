use std::collections::HashMap;

use crate::{
    services::suggestions::suggestion_service::{SuggestionError, SuggestionRequest},
    types::{
        app_state::AppState,
        category::Category,
        coordinate::Coordinate,
        suggestion::BudgetRange,
    },
    utils::{app_error::AppError, validated_json::ValidatedJson, validators::not_blank},
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
use validator::{Validate, ValidationError};

fn default_num_places() -> usize {
    5
}

fn default_max_deviation_minutes() -> f64 {
    30.0
}

fn valid_coordinates(coordinates: &[Coordinate]) -> Result<(), ValidationError> {
    if coordinates.iter().all(Coordinate::is_valid) {
        Ok(())
    } else {
        Err(ValidationError::new("coordinate_out_of_range"))
    }
}

#[derive(Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSuggestionsPayload {
    #[validate(
        length(min = 1, message = "Must be at least 1 character"),
        custom(function = "not_blank")
    )]
    pub start: String,

    #[validate(
        length(min = 1, message = "Must be at least 1 character"),
        custom(function = "not_blank")
    )]
    pub end: String,

    #[serde(default = "default_num_places")]
    pub num_places: usize,

    #[serde(default)]
    pub categories: Vec<Category>,

    #[validate(
        length(min = 2, message = "Route needs at least two points"),
        custom(function = "valid_coordinates")
    )]
    pub coordinates: Vec<Coordinate>,

    #[serde(default = "default_max_deviation_minutes")]
    #[validate(range(min = 0.0, max = 600.0))]
    pub max_deviation_minutes: f64,

    #[serde(default)]
    pub subcategories: HashMap<Category, Vec<String>>,

    #[serde(default)]
    pub budget_by_category: HashMap<Category, BudgetRange>,
}

impl From<PostSuggestionsPayload> for SuggestionRequest {
    fn from(payload: PostSuggestionsPayload) -> Self {
        SuggestionRequest {
            start: payload.start,
            end: payload.end,
            count: SuggestionRequest::clamp_count(payload.num_places),
            categories: Category::or_default_set(&payload.categories),
            route: payload.coordinates,
            max_deviation_minutes: payload.max_deviation_minutes,
            subcategories: payload.subcategories,
            budgets: payload.budget_by_category,
        }
    }
}

#[cfg_attr(test, debug_handler)]
pub async fn post_suggestions(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PostSuggestionsPayload>,
) -> Result<Response, AppError> {
    let request = SuggestionRequest::from(payload);

    let suggestions = state
        .suggestions
        .suggest(&request)
        .await
        .map_err(|e| match e {
            e @ SuggestionError::NotConfigured => AppError::unavailable(&e.to_string()),
            SuggestionError::PlacesUnavailable => AppError::new(
                StatusCode::BAD_GATEWAY,
                "Could not load places. Please try again.",
            ),
            SuggestionError::Narrative(e) => {
                error!("Failed to generate suggestions: {}", e);
                AppError::new(StatusCode::BAD_GATEWAY, "Failed to generate suggestions")
            }
        })?;

    Ok(Json(suggestions).into_response())
}
