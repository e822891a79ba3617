use std::time::Duration;

use urlencoding::encode;

use super::types::{
    google_text_search_response::{GooglePlaceResult, GoogleTextSearchResponse},
    places_service_error::PlacesServiceError,
};
use crate::types::coordinate::Coordinate;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);
const PHOTO_TIMEOUT: Duration = Duration::from_secs(15);
const PHOTO_MAX_WIDTH: u32 = 400;
const PHOTO_LOOKUP_RADIUS_M: u32 = 5000;

#[derive(Clone)]
pub struct PlacesServiceConfig {
    pub api_key: String,
    pub host: String,
}

#[derive(Clone)]
pub struct PlacesService {
    config: PlacesServiceConfig,
    client: reqwest::Client,
}

pub struct TextSearchInput<'a> {
    pub query: &'a str,
    pub place_type: Option<&'a str>,
    pub location: Coordinate,
    pub radius_m: u32,
}

/// Image bytes from the photo endpoint.
pub struct PlacePhoto {
    pub content_type: String,
    pub response: reqwest::Response,
}

/// Public path under which photo references are proxied.
pub fn photo_path(photo_reference: &str) -> String {
    format!("/api/place-photo?ref={}", encode(photo_reference))
}

impl PlacesService {
    pub fn new(config: PlacesServiceConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub async fn text_search(
        &self,
        input: TextSearchInput<'_>,
    ) -> Result<Vec<GooglePlaceResult>, PlacesServiceError> {
        let mut url = format!(
            "{}/maps/api/place/textsearch/json?query={}&location={},{}&radius={}&key={}",
            self.config.host,
            encode(input.query),
            input.location.lat,
            input.location.lon,
            input.radius_m,
            encode(&self.config.api_key)
        );
        if let Some(place_type) = input.place_type {
            url.push_str(&format!("&type={}", encode(place_type)));
        }

        let resp = self
            .client
            .get(&url)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(PlacesServiceError::Status(resp.status()));
        }

        let body = resp.json::<GoogleTextSearchResponse>().await?;

        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(body.results),
            other => Err(PlacesServiceError::Provider(other.to_string())),
        }
    }

    /// Photo URL for the best text-search match near `location`, if any.
    pub async fn find_photo(&self, location: Coordinate, name: &str) -> Option<String> {
        let results = self
            .text_search(TextSearchInput {
                query: name,
                place_type: None,
                location,
                radius_m: PHOTO_LOOKUP_RADIUS_M,
            })
            .await
            .ok()?;

        results
            .into_iter()
            .next()
            .and_then(|p| p.photos.into_iter().next())
            .map(|photo| photo_path(&photo.photo_reference))
    }

    pub async fn fetch_photo(&self, photo_reference: &str) -> Result<PlacePhoto, PlacesServiceError> {
        let url = format!(
            "{}/maps/api/place/photo?maxwidth={}&photoreference={}&key={}",
            self.config.host,
            PHOTO_MAX_WIDTH,
            encode(photo_reference),
            encode(&self.config.api_key)
        );

        let resp = self
            .client
            .get(&url)
            .timeout(PHOTO_TIMEOUT)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(PlacesServiceError::Status(resp.status()));
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();

        Ok(PlacePhoto {
            content_type,
            response: resp,
        })
    }
}
