use serde::{Deserialize, Serialize};

use crate::types::coordinate::Coordinate;

#[derive(Deserialize, Serialize)]
pub struct OrsDirectionsRequest {
    pub coordinates: Vec<Coordinate>,
}

#[derive(Deserialize, Serialize, Default)]
pub struct OrsSummary {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Deserialize, Serialize, Default)]
pub struct OrsProperties {
    #[serde(default)]
    pub summary: OrsSummary,
}

#[derive(Deserialize, Serialize)]
pub struct OrsGeometry {
    pub coordinates: Vec<Coordinate>,
}

#[derive(Deserialize, Serialize)]
pub struct OrsFeature {
    pub geometry: OrsGeometry,
    #[serde(default)]
    pub properties: OrsProperties,
}

#[derive(Deserialize, Serialize)]
pub struct OrsDirectionsResponse {
    #[serde(default)]
    pub features: Vec<OrsFeature>,
}

#[derive(Deserialize, Serialize)]
pub struct OrsErrorDetail {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize, Serialize)]
pub struct OrsErrorResponse {
    pub error: OrsErrorDetail,
}
