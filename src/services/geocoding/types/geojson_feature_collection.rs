use serde::{Deserialize, Serialize};

/// Shared by Photon and the OpenRouteService geocoder.
#[derive(Deserialize, Serialize)]
pub struct FeatureCollectionGeometry {
    pub coordinates: Vec<f64>,
}

#[derive(Deserialize, Serialize)]
pub struct FeatureCollectionFeature {
    pub geometry: FeatureCollectionGeometry,
}

#[derive(Deserialize, Serialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<FeatureCollectionFeature>,
}
