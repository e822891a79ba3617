use axum::{
    routing::{get, post},
    Router,
};

use crate::types::app_state::AppState;

mod get_geocode;
mod get_location_search;
mod get_music_auth;
mod get_music_callback;
mod get_music_now_playing;
mod get_music_top_tracks;
mod get_place_photo;
mod get_route;
mod get_trip;
mod get_weather;
mod music_support;
mod post_suggestions;

pub fn apply_routes(app: Router<AppState>) -> Router<AppState> {
    app.route("/geocode", get(get_geocode::get_geocode))
        .route("/search", get(get_location_search::get_location_search))
        .route("/route", get(get_route::get_route))
        .route("/suggestions", post(post_suggestions::post_suggestions))
        .route("/place-photo", get(get_place_photo::get_place_photo))
        .route("/weather", get(get_weather::get_weather))
        .route("/trip", get(get_trip::get_trip))
        .route(
            "/music/now-playing",
            get(get_music_now_playing::get_music_now_playing),
        )
        .route(
            "/music/top-tracks",
            get(get_music_top_tracks::get_music_top_tracks),
        )
        .route("/music/auth", get(get_music_auth::get_music_auth))
        .route(
            "/music/callback",
            get(get_music_callback::get_music_callback),
        )
}
