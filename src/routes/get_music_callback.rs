use crate::{
    routes::music_support::redirect_uri,
    services::music::types::music_service_error::MusicServiceError,
    types::app_state::AppState,
    utils::html::{escape_html, simple_page},
};
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};
#[cfg(test)]
use axum_macros::debug_handler;
use serde::Deserialize;
use tracing::{error, info};

#[derive(Deserialize)]
pub struct GetMusicCallbackPayload {
    pub code: Option<String>,
    pub error: Option<String>,
}

fn error_page(heading: &str, detail: &str) -> Html<String> {
    Html(simple_page(
        "Spotify - Error",
        &format!(
            "<h1>{}</h1>\n    <p>{}</p>",
            escape_html(heading),
            escape_html(detail)
        ),
    ))
}

/// Finishes the authorization-code flow and shows the refresh token to paste
/// into the environment. Every outcome renders a page.
#[cfg_attr(test, debug_handler)]
pub async fn get_music_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(GetMusicCallbackPayload { code, error }): Query<GetMusicCallbackPayload>,
) -> Response {
    if let Some(reason) = error {
        return error_page(
            "Spotify authorization failed",
            &format!("Error: {}", reason),
        )
        .into_response();
    }

    let Some(code) = code.filter(|c| !c.is_empty()) else {
        return error_page(
            "Spotify setup incomplete",
            "Add SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET to the environment first.",
        )
        .into_response();
    };

    let redirect = redirect_uri(state.app_url.as_deref(), &headers);

    match state.music.exchange_code(&code, &redirect).await {
        Ok(Some(refresh_token)) => {
            info!("Spotify authorization completed");
            Html(simple_page(
                "Spotify - Success",
                &format!(
                    "<h1>Spotify connected</h1>\n    <p>Add this to your environment:</p>\n    <pre>SPOTIFY_REFRESH_TOKEN={}</pre>\n    <p>Then restart the server.</p>",
                    escape_html(&refresh_token)
                ),
            ))
            .into_response()
        }
        Ok(None) => error_page(
            "No refresh token received",
            "Try again or check your Spotify app settings.",
        )
        .into_response(),
        Err(MusicServiceError::NotConfigured(_)) => error_page(
            "Spotify setup incomplete",
            "Add SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET to the environment first.",
        )
        .into_response(),
        Err(MusicServiceError::TokenRejected(body)) => {
            error_page("Token exchange failed", &body).into_response()
        }
        Err(e) => {
            error!("Spotify code exchange failed: {}", e);
            error_page("Something went wrong", &e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{app::gen_mock_app_with, types::app_config::SpotifyCredentials};

    async fn page(mock_app: &crate::app::MockApp, uri: &str) -> String {
        let response = mock_app
            .app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    fn with_client(config: &mut crate::types::app_config::AppConfig) {
        config.app_url = Some("https://trips.example".to_string());
        config.spotify = SpotifyCredentials {
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            refresh_token: None,
        };
    }

    #[tokio::test]
    async fn test_get_music_callback() {
        let mut mock_app = gen_mock_app_with(with_client).await;

        let exchange = mock_app
            .server
            .mock("POST", "/api/token")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("grant_type".to_string(), "authorization_code".to_string()),
                mockito::Matcher::UrlEncoded("code".to_string(), "abc".to_string()),
                mockito::Matcher::UrlEncoded(
                    "redirect_uri".to_string(),
                    "https://trips.example/api/music/callback".to_string(),
                ),
            ]))
            .with_body(r#"{"access_token":"a","refresh_token":"r<1>"}"#)
            .create_async()
            .await;

        let html = page(&mock_app, "/api/music/callback?code=abc").await;

        exchange.assert_async().await;
        assert!(html.contains("SPOTIFY_REFRESH_TOKEN=r&lt;1&gt;"));
    }

    #[tokio::test]
    async fn provider_errors_are_escaped() {
        let mock_app = gen_mock_app_with(with_client).await;

        let html = page(
            &mock_app,
            "/api/music/callback?error=%3Cscript%3Ealert(1)%3C%2Fscript%3E",
        )
        .await;

        assert!(html.contains("Spotify authorization failed"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[tokio::test]
    async fn rejected_exchange_and_missing_token_render_pages() {
        let mut mock_app = gen_mock_app_with(with_client).await;
        mock_app
            .server
            .mock("POST", "/api/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant"}"#)
            .create_async()
            .await;
        let html = page(&mock_app, "/api/music/callback?code=stale").await;
        assert!(html.contains("Token exchange failed"));
        assert!(html.contains("invalid_grant"));

        let mut mock_app = gen_mock_app_with(with_client).await;
        mock_app
            .server
            .mock("POST", "/api/token")
            .with_body(r#"{"access_token":"a"}"#)
            .create_async()
            .await;
        let html = page(&mock_app, "/api/music/callback?code=abc").await;
        assert!(html.contains("No refresh token received"));

        let mock_app = gen_mock_app_with(with_client).await;
        let html = page(&mock_app, "/api/music/callback").await;
        assert!(html.contains("Spotify setup incomplete"));
    }
}
