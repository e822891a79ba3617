use serde::{Deserialize, Serialize};

/// Nominatim returns coordinates as strings.
#[derive(Deserialize, Serialize, Clone)]
pub struct NominatimPlace {
    pub display_name: String,
    pub lat: String,
    pub lon: String,
}

pub type NominatimSearchResponse = Vec<NominatimPlace>;
