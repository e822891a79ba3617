use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::{
    ors_directions_response::{OrsDirectionsRequest, OrsDirectionsResponse, OrsErrorResponse},
    route_response::{Route, RouteGeometry, RouteResponse},
};
use crate::{services::fallback::ProviderOutcome, types::coordinate::Coordinate};

pub const ROUTE_TIMEOUT: Duration = Duration::from_secs(15);
pub const MAX_ALTERNATIVES: usize = 3;

/// OpenRouteService error codes meaning "the request was fine but there is no path".
const ORS_NO_ROUTE_CODES: [i64; 2] = [2009, 2010];
const OSRM_NO_ROUTE_CODES: [&str; 2] = ["NoRoute", "NoSegment"];

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl Profile {
    pub fn osrm_name(&self) -> &'static str {
        match self {
            Profile::Driving => "driving",
            Profile::Walking => "walking",
            Profile::Cycling => "cycling",
        }
    }

    pub fn ors_name(&self) -> &'static str {
        match self {
            Profile::Driving => "driving-car",
            Profile::Walking => "foot-walking",
            Profile::Cycling => "cycling-regular",
        }
    }
}

#[async_trait]
pub trait RouteProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn route(&self, waypoints: &[Coordinate], profile: Profile)
        -> ProviderOutcome<RouteResponse>;
}

#[derive(Clone)]
pub struct OsrmRouter {
    host: String,
    client: reqwest::Client,
}

impl OsrmRouter {
    pub fn new(host: String, client: reqwest::Client) -> Self {
        Self { host, client }
    }
}

#[async_trait]
impl RouteProvider for OsrmRouter {
    fn name(&self) -> &'static str {
        "osrm"
    }

    async fn route(
        &self,
        waypoints: &[Coordinate],
        profile: Profile,
    ) -> ProviderOutcome<RouteResponse> {
        let coords = waypoints
            .iter()
            .map(Coordinate::to_string)
            .collect::<Vec<_>>()
            .join(";");
        let url = format!(
            "{}/route/v1/{}/{}?overview=full&geometries=geojson&alternatives=true",
            self.host,
            profile.osrm_name(),
            coords
        );

        let resp = match self.client.get(&url).timeout(ROUTE_TIMEOUT).send().await {
            Ok(resp) => resp,
            Err(e) => return ProviderOutcome::Failed(format!("Failed to send request: {}", e)),
        };
        let status = resp.status();

        // OSRM reports "no path" with a 400 and a JSON body, so read the body either way.
        let mut body = match resp.json::<RouteResponse>().await {
            Ok(body) => body,
            Err(e) => {
                return ProviderOutcome::Failed(format!(
                    "Unexpected response ({}): {}",
                    status, e
                ))
            }
        };

        if OSRM_NO_ROUTE_CODES.contains(&body.code.as_str()) {
            return ProviderOutcome::NotFound;
        }

        if !status.is_success() || body.code != "Ok" {
            return ProviderOutcome::Failed(format!("status {}, code {}", status, body.code));
        }

        if body.routes.is_empty() {
            return ProviderOutcome::NotFound;
        }

        body.routes.truncate(MAX_ALTERNATIVES);
        ProviderOutcome::Found(body)
    }
}

#[derive(Clone)]
pub struct OpenRouteServiceRouter {
    host: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenRouteServiceRouter {
    pub fn new(host: String, api_key: String, client: reqwest::Client) -> Self {
        Self {
            host,
            api_key,
            client,
        }
    }
}

#[async_trait]
impl RouteProvider for OpenRouteServiceRouter {
    fn name(&self) -> &'static str {
        "openrouteservice"
    }

    async fn route(
        &self,
        waypoints: &[Coordinate],
        profile: Profile,
    ) -> ProviderOutcome<RouteResponse> {
        let url = format!(
            "{}/v2/directions/{}/geojson",
            self.host,
            profile.ors_name()
        );

        let resp = match self
            .client
            .post(&url)
            .header("authorization", &self.api_key)
            .json(&OrsDirectionsRequest {
                coordinates: waypoints.to_vec(),
            })
            .timeout(ROUTE_TIMEOUT)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return ProviderOutcome::Failed(format!("Failed to send request: {}", e)),
        };

        let status = resp.status();
        if !status.is_success() {
            return match resp.json::<OrsErrorResponse>().await {
                Ok(err) if ORS_NO_ROUTE_CODES.contains(&err.error.code) => {
                    ProviderOutcome::NotFound
                }
                Ok(err) => ProviderOutcome::Failed(format!(
                    "status {}, error {}: {}",
                    status, err.error.code, err.error.message
                )),
                Err(_) => ProviderOutcome::Failed(format!("status {}", status)),
            };
        }

        let body = match resp.json::<OrsDirectionsResponse>().await {
            Ok(body) => body,
            Err(e) => {
                return ProviderOutcome::Failed(format!("Failed to get response body: {}", e))
            }
        };

        let routes: Vec<Route> = body
            .features
            .into_iter()
            .filter(|f| f.geometry.coordinates.len() >= 2)
            .take(MAX_ALTERNATIVES)
            .map(|f| Route {
                distance: f.properties.summary.distance,
                duration: f.properties.summary.duration,
                geometry: RouteGeometry {
                    coordinates: f.geometry.coordinates,
                },
            })
            .collect();

        if routes.is_empty() {
            return ProviderOutcome::NotFound;
        }

        ProviderOutcome::Found(RouteResponse {
            code: "Ok".to_string(),
            routes,
            message: None,
        })
    }
}
