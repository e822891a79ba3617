use crate::{
    services::geocoding::providers::PlaceLabel,
    types::app_state::AppState,
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
pub struct GetLocationSearchPayload {
    #[serde(default)]
    pub q: String,
}

/// Autocomplete. Upstream failures and blank input both answer `[]`.
#[cfg_attr(test, debug_handler)]
pub async fn get_location_search(
    State(state): State<AppState>,
    ValidatedQuery(GetLocationSearchPayload { q }): ValidatedQuery<GetLocationSearchPayload>,
) -> Result<Response, AppError> {
    let query = q.trim();
    if query.is_empty() {
        return Ok(Json(Vec::<PlaceLabel>::new()).into_response());
    }

    Ok(Json(state.geocoding.search(query).await).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::app::gen_mock_app;

    #[tokio::test]
    async fn test_get_location_search() {
        let mut mock_app = gen_mock_app().await;

        let mock_server = mock_app
            .server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("q".to_string(), "Rich".to_string()),
                mockito::Matcher::UrlEncoded("limit".to_string(), "8".to_string()),
            ]))
            .with_body(
                r#"[{"display_name":"Richmond, Virginia, United States","lat":"37.5385","lon":"-77.4343","importance":0.7}]"#,
            )
            .create_async()
            .await;

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/api/search?q=Rich")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        mock_server.assert_async().await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Vec<PlaceLabel> = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body,
            vec![PlaceLabel {
                display_name: "Richmond, Virginia, United States".to_string(),
                lat: "37.5385".to_string(),
                lon: "-77.4343".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn missing_query_is_an_empty_list() {
        let mut mock_app = gen_mock_app().await;

        let mock_server = mock_app
            .server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let response = mock_app
            .app
            .oneshot(Request::builder().uri("/api/search").body(Body::empty()).unwrap())
            .await
            .unwrap();

        mock_server.assert_async().await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"[]");
    }
}
