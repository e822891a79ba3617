use serde::{Deserialize, Serialize};

use crate::types::coordinate::Coordinate;

/// Polyline in GeoJSON order.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct RouteGeometry {
    pub coordinates: Vec<Coordinate>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Route {
    /// meters
    pub distance: f64,
    /// seconds
    pub duration: f64,
    pub geometry: RouteGeometry,
}

/// OSRM-shaped routing answer. Other providers are converted into it.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct RouteResponse {
    pub code: String,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
