use crate::{
    services::{
        fallback::ProviderOutcome,
        routing::{
            providers::Profile,
            routing_service::{no_route_message, ROUTING_UNAVAILABLE_MESSAGE},
            types::route_response::Route,
        },
        weather::weather_service::CurrentWeather,
    },
    types::{app_state::AppState, coordinate::Coordinate},
    utils::{app_error::AppError, validated_query::ValidatedQuery, validators::not_blank},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
#[cfg(test)]
use axum_macros::debug_handler;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

const UNRESOLVED_MESSAGE: &str = "Could not find one or both locations. Try being more specific.";

#[derive(Validate, Deserialize)]
pub struct GetTripPayload {
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

    #[serde(default)]
    pub profile: Profile,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TripEndpoint {
    pub query: String,
    pub coordinate: Coordinate,
    pub weather: Option<CurrentWeather>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TripRoute {
    pub distance_km: f64,
    pub duration_min: f64,
    pub geometry: Vec<Coordinate>,
}

impl From<Route> for TripRoute {
    fn from(route: Route) -> Self {
        TripRoute {
            distance_km: (route.distance / 100.0).round() / 10.0,
            duration_min: (route.duration / 60.0).round(),
            geometry: route.geometry.coordinates,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GetTripResponse {
    pub start: TripEndpoint,
    pub end: TripEndpoint,
    pub profile: Profile,
    pub routes: Vec<TripRoute>,
}

/// Geocodes both ends, routes between them and attaches current weather at each end.
#[cfg_attr(test, debug_handler)]
pub async fn get_trip(
    State(state): State<AppState>,
    ValidatedQuery(GetTripPayload {
        start,
        end,
        profile,
    }): ValidatedQuery<GetTripPayload>,
) -> Result<Response, AppError> {
    let (from, to) = tokio::join!(
        state.geocoding.geocode(start.trim()),
        state.geocoding.geocode(end.trim())
    );
    let (Some(from), Some(to)) = (from, to) else {
        return Err(AppError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            UNRESOLVED_MESSAGE,
        ));
    };

    let routes = match state.routing.route(&[from, to], profile).await {
        ProviderOutcome::Found(found) => found.routes,
        ProviderOutcome::NotFound => {
            return Err(AppError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                &no_route_message(from, to),
            ))
        }
        ProviderOutcome::Failed(_) => {
            return Err(AppError::unavailable(ROUTING_UNAVAILABLE_MESSAGE))
        }
    };

    let mut weather = state.weather.current_many(&[from, to]).await.into_iter();
    let (start_weather, end_weather) = (weather.next().flatten(), weather.next().flatten());

    info!(
        start = %from,
        end = %to,
        routes = routes.len(),
        "trip planned"
    );

    Ok(Json(GetTripResponse {
        start: TripEndpoint {
            query: start,
            coordinate: from,
            weather: start_weather,
        },
        end: TripEndpoint {
            query: end,
            coordinate: to,
            weather: end_weather,
        },
        profile,
        routes: routes.into_iter().map(TripRoute::from).collect(),
    })
    .into_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{app::gen_mock_app, utils::app_error::ErrorResponse};

    async fn photon_hit(server: &mut mockito::ServerGuard, query: &str, lon: f64, lat: f64) {
        server
            .mock("GET", "/api/")
            .match_query(mockito::Matcher::UrlEncoded(
                "q".to_string(),
                query.to_string(),
            ))
            .with_body(format!(
                r#"{{"features":[{{"geometry":{{"coordinates":[{},{}]}}}}]}}"#,
                lon, lat
            ))
            .create_async()
            .await;
    }

    #[tokio::test]
    async fn test_get_trip() {
        let mut mock_app = gen_mock_app().await;

        photon_hit(&mut mock_app.server, "Richmond", -77.43, 37.54).await;
        photon_hit(&mut mock_app.server, "Washington", -77.03, 38.9).await;
        let route_mock = mock_app
            .server
            .mock("GET", "/route/v1/driving/-77.43,37.54;-77.03,38.9")
            .match_query(mockito::Matcher::Any)
            .with_body(
                r#"{"code":"Ok","routes":[{"distance":172049.0,"duration":6389.0,"geometry":{"coordinates":[[-77.43,37.54],[-77.03,38.9]]}}]}"#,
            )
            .create_async()
            .await;
        mock_app
            .server
            .mock("GET", "/v1/forecast")
            .match_query(mockito::Matcher::Any)
            .with_body(
                r#"{"current_weather":{"temperature":18.2,"windspeed":7.0,"weathercode":0,"time":"2026-10-19T12:00"}}"#,
            )
            .expect(2)
            .create_async()
            .await;

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/api/trip?start=Richmond&end=Washington")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        route_mock.assert_async().await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: GetTripResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.start.coordinate, Coordinate::new(-77.43, 37.54));
        assert_eq!(body.end.coordinate, Coordinate::new(-77.03, 38.9));
        assert_eq!(body.profile, Profile::Driving);
        assert_eq!(body.routes[0].distance_km, 172.0);
        assert_eq!(body.routes[0].duration_min, 106.0);
        assert_eq!(body.start.weather.unwrap().summary, "Clear sky");
        assert!(body.end.weather.is_some());
    }

    #[tokio::test]
    async fn unresolvable_location_is_unprocessable() {
        let mut mock_app = gen_mock_app().await;

        photon_hit(&mut mock_app.server, "Richmond", -77.43, 37.54).await;
        mock_app
            .server
            .mock("GET", "/api/")
            .match_query(mockito::Matcher::UrlEncoded(
                "q".to_string(),
                "Qwzx".to_string(),
            ))
            .with_body(r#"{"features":[]}"#)
            .create_async()
            .await;
        mock_app
            .server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::Any)
            .with_body("[]")
            .create_async()
            .await;

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/api/trip?start=Richmond&end=Qwzx")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.error, UNRESOLVED_MESSAGE);
    }

    #[tokio::test]
    async fn route_outages_are_unavailable() {
        let mut mock_app = gen_mock_app().await;

        photon_hit(&mut mock_app.server, "Richmond", -77.43, 37.54).await;
        photon_hit(&mut mock_app.server, "Washington", -77.03, 38.9).await;
        mock_app
            .server
            .mock("GET", mockito::Matcher::Regex("^/route/v1/".to_string()))
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/api/trip?start=Richmond&end=Washington")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn blank_locations_are_rejected_before_any_lookup() {
        let mut mock_app = gen_mock_app().await;
        let never = mock_app
            .server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/api/trip?start=%20%20&end=Washington")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        never.assert_async().await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn route_summary_rounds_units() {
        let route = TripRoute::from(Route {
            distance: 12_345.0,
            duration: 1_530.0,
            geometry: crate::services::routing::types::route_response::RouteGeometry {
                coordinates: vec![],
            },
        });

        assert_eq!(route.distance_km, 12.3);
        assert_eq!(route.duration_min, 26.0);
    }
}
