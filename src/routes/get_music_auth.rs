use crate::{routes::music_support::redirect_uri, types::app_state::AppState};
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
#[cfg(test)]
use axum_macros::debug_handler;
use tracing::warn;

/// Sends the site owner to Spotify's consent page.
#[cfg_attr(test, debug_handler)]
pub async fn get_music_auth(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let redirect = redirect_uri(state.app_url.as_deref(), &headers);

    match state.music.authorize_url(&redirect) {
        Some(url) => Redirect::to(&url).into_response(),
        None => {
            warn!("Spotify authorization requested without SPOTIFY_CLIENT_ID");
            Redirect::to("/?spotify=missing-keys").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header::LOCATION, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{
        app::{gen_mock_app, gen_mock_app_with},
        types::app_config::SpotifyCredentials,
    };

    #[tokio::test]
    async fn test_get_music_auth() {
        let mock_app = gen_mock_app_with(|config| {
            config.spotify = SpotifyCredentials {
                client_id: Some("client".to_string()),
                ..Default::default()
            };
        })
        .await;
        let accounts = mock_app.server.url();

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/api/music/auth")
                    .header("host", "localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[LOCATION].to_str().unwrap();
        assert!(location.starts_with(&format!("{}/authorize?client_id=client", accounts)));
        assert!(location.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A3000%2Fapi%2Fmusic%2Fcallback"));
    }

    #[tokio::test]
    async fn missing_client_id_goes_home() {
        let mock_app = gen_mock_app().await;

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/api/music/auth")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/?spotify=missing-keys");
    }
}
