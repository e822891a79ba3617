use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GooglePlacePhoto {
    pub photo_reference: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct GooglePlaceLocation {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GooglePlaceGeometry {
    pub location: Option<GooglePlaceLocation>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct GooglePlaceResult {
    pub name: Option<String>,
    pub place_id: Option<String>,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    #[serde(default)]
    pub photos: Vec<GooglePlacePhoto>,
    pub geometry: Option<GooglePlaceGeometry>,
    /// 0 (free) to 4 (very expensive)
    pub price_level: Option<u8>,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleTextSearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GooglePlaceResult>,
}
