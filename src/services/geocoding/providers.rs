use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use urlencoding::encode;

use super::types::{
    geojson_feature_collection::FeatureCollection,
    nominatim_search_response::NominatimSearchResponse,
};
use crate::{services::fallback::ProviderOutcome, types::coordinate::Coordinate};

pub const GEOCODE_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn geocode(&self, query: &str) -> ProviderOutcome<Coordinate>;
}

/// Autocomplete entry, shaped the way Nominatim reports it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlaceLabel {
    pub display_name: String,
    pub lat: String,
    pub lon: String,
}

async fn fetch_json<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, String> {
    let resp = request
        .timeout(GEOCODE_TIMEOUT)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !resp.status().is_success() {
        return Err(format!("Unexpected status {}", resp.status()));
    }

    resp.json::<T>()
        .await
        .map_err(|e| format!("Failed to get response body: {}", e))
}

fn first_feature(collection: FeatureCollection) -> ProviderOutcome<Coordinate> {
    match collection
        .features
        .into_iter()
        .next()
        .map(|f| f.geometry.coordinates)
    {
        Some(c) if c.len() >= 2 => ProviderOutcome::Found(Coordinate::new(c[0], c[1])),
        _ => ProviderOutcome::NotFound,
    }
}

#[derive(Clone)]
pub struct NominatimGeocoder {
    host: String,
    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new(host: String, client: reqwest::Client) -> Self {
        Self { host, client }
    }

    pub async fn search(&self, query: &str, limit: u8) -> Result<Vec<PlaceLabel>, String> {
        let url = format!(
            "{}/search?format=json&q={}&limit={}",
            self.host,
            encode(query),
            limit
        );

        let places = fetch_json::<NominatimSearchResponse>(self.client.get(&url)).await?;

        Ok(places
            .into_iter()
            .map(|p| PlaceLabel {
                display_name: p.display_name,
                lat: p.lat,
                lon: p.lon,
            })
            .collect())
    }
}

#[async_trait]
impl GeocodeProvider for NominatimGeocoder {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn geocode(&self, query: &str) -> ProviderOutcome<Coordinate> {
        let place = match self.search(query, 1).await {
            Ok(places) => match places.into_iter().next() {
                Some(p) => p,
                None => return ProviderOutcome::NotFound,
            },
            Err(e) => return ProviderOutcome::Failed(e),
        };

        match (place.lon.parse::<f64>(), place.lat.parse::<f64>()) {
            (Ok(lon), Ok(lat)) => ProviderOutcome::Found(Coordinate::new(lon, lat)),
            _ => ProviderOutcome::Failed(format!(
                "Unparseable coordinates {},{}",
                place.lon, place.lat
            )),
        }
    }
}

#[derive(Clone)]
pub struct PhotonGeocoder {
    host: String,
    client: reqwest::Client,
}

impl PhotonGeocoder {
    pub fn new(host: String, client: reqwest::Client) -> Self {
        Self { host, client }
    }
}

#[async_trait]
impl GeocodeProvider for PhotonGeocoder {
    fn name(&self) -> &'static str {
        "photon"
    }

    async fn geocode(&self, query: &str) -> ProviderOutcome<Coordinate> {
        let url = format!("{}/api/?q={}&limit=1", self.host, encode(query));

        match fetch_json::<FeatureCollection>(
            self.client.get(&url).header("accept", "application/json"),
        )
        .await
        {
            Ok(collection) => first_feature(collection),
            Err(e) => ProviderOutcome::Failed(e),
        }
    }
}

#[derive(Clone)]
pub struct OpenRouteServiceGeocoder {
    host: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenRouteServiceGeocoder {
    pub fn new(host: String, api_key: String, client: reqwest::Client) -> Self {
        Self {
            host,
            api_key,
            client,
        }
    }
}

#[async_trait]
impl GeocodeProvider for OpenRouteServiceGeocoder {
    fn name(&self) -> &'static str {
        "openrouteservice"
    }

    async fn geocode(&self, query: &str) -> ProviderOutcome<Coordinate> {
        let url = format!(
            "{}/geocode/search?api_key={}&text={}&size=1",
            self.host,
            encode(&self.api_key),
            encode(query)
        );

        match fetch_json::<FeatureCollection>(self.client.get(&url)).await {
            Ok(collection) => first_feature(collection),
            Err(e) => ProviderOutcome::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn nominatim_parses_string_coordinates() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::UrlEncoded(
                "q".to_string(),
                "Richmond, VA".to_string(),
            ))
            .with_header("content-type", "application/json")
            .with_body(r#"[{"display_name":"Richmond","lat":"37.54","lon":"-77.43"}]"#)
            .create_async()
            .await;

        let geocoder = NominatimGeocoder::new(server.url(), reqwest::Client::new());

        assert_eq!(
            geocoder.geocode("Richmond, VA").await,
            ProviderOutcome::Found(Coordinate::new(-77.43, 37.54))
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn photon_empty_features_is_not_found_and_errors_fail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/")
            .match_query(mockito::Matcher::UrlEncoded(
                "q".to_string(),
                "nowhere".to_string(),
            ))
            .with_body(r#"{"features":[]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/")
            .match_query(mockito::Matcher::UrlEncoded(
                "q".to_string(),
                "broken".to_string(),
            ))
            .with_status(500)
            .create_async()
            .await;

        let geocoder = PhotonGeocoder::new(server.url(), reqwest::Client::new());

        assert_eq!(geocoder.geocode("nowhere").await, ProviderOutcome::NotFound);
        assert!(matches!(
            geocoder.geocode("broken").await,
            ProviderOutcome::Failed(_)
        ));
    }

    #[tokio::test]
    async fn openrouteservice_reads_geojson_order() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/geocode/search")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("api_key".to_string(), "ors-key".to_string()),
                mockito::Matcher::UrlEncoded("text".to_string(), "Baltimore".to_string()),
            ]))
            .with_body(r#"{"features":[{"geometry":{"coordinates":[-76.61,39.29]}}]}"#)
            .create_async()
            .await;

        let geocoder = OpenRouteServiceGeocoder::new(
            server.url(),
            "ors-key".to_string(),
            reqwest::Client::new(),
        );

        assert_eq!(
            geocoder.geocode("Baltimore").await,
            ProviderOutcome::Found(Coordinate::new(-76.61, 39.29))
        );
    }
}
