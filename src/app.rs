use crate::{
    routes::apply_routes,
    services::{
        geocoding::geocoding_service::GeocodingService,
        music::music_service::MusicService,
        narrative::narrative_service::{NarrativeService, NarrativeServiceConfig},
        places::places_service::{PlacesService, PlacesServiceConfig},
        routing::routing_service::RoutingService,
        suggestions::suggestion_service::SuggestionService,
        weather::weather_service::WeatherService,
    },
    types::{app_config::AppConfig, app_state::AppState},
    utils::http_client::build_client,
};
use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub fn gen_state(config: &AppConfig) -> AppState {
    let client = build_client();

    let geocoding = GeocodingService::new(config, client.clone());
    let places = config.google_places_key.as_ref().map(|key| {
        PlacesService::new(
            PlacesServiceConfig {
                api_key: key.clone(),
                host: config.hosts.google.clone(),
            },
            client.clone(),
        )
    });
    let narrative = NarrativeServiceConfig::from_app_config(config)
        .map(|c| NarrativeService::new(c, client.clone()));

    let routing = RoutingService::new(config, client.clone());
    info!(
        routing = ?routing.provider_names(),
        places = places.is_some(),
        narrative = narrative.is_some(),
        "providers configured"
    );

    AppState {
        suggestions: SuggestionService::new(
            geocoding.clone(),
            places.clone(),
            narrative,
            config.suggestion_source,
        ),
        routing,
        weather: WeatherService::new(config.hosts.open_meteo.clone(), client.clone()),
        music: MusicService::new(config, client),
        app_url: config.app_url.clone(),
        geocoding,
        places,
    }
}

pub fn gen_app(config: &AppConfig) -> Router {
    let cors_middleware = CorsLayer::permissive();

    Router::new()
        .nest("/api", apply_routes(Router::new()))
        .route("/", get(root))
        .layer(cors_middleware)
        .layer(TraceLayer::new_for_http())
        .with_state(gen_state(config))
}

async fn root() -> &'static str {
    "Waypoint route planner API"
}

#[cfg(test)]
pub struct MockApp {
    pub app: Router,
    pub server: mockito::ServerGuard,
}

/// App whose every provider points at one mock server, with no keys set.
#[cfg(test)]
pub async fn gen_mock_app() -> MockApp {
    gen_mock_app_with(|_| {}).await
}

#[cfg(test)]
pub async fn gen_mock_app_with<F>(customize: F) -> MockApp
where
    F: FnOnce(&mut AppConfig),
{
    let server = mockito::Server::new_async().await;
    let mut config = AppConfig::with_host(&server.url());
    customize(&mut config);

    MockApp {
        app: gen_app(&config),
        server,
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::Request,
        http::StatusCode,
    };
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn hello_world() {
        let mock_app = gen_mock_app().await;

        let response = mock_app
            .app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Waypoint route planner API");
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let mock_app = gen_mock_app().await;

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/api/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
