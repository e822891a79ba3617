use crate::services::{
    geocoding::geocoding_service::GeocodingService, music::music_service::MusicService,
    places::places_service::PlacesService, routing::routing_service::RoutingService,
    suggestions::suggestion_service::SuggestionService, weather::weather_service::WeatherService,
};

#[derive(Clone)]
pub struct AppState {
    pub geocoding: GeocodingService,
    pub routing: RoutingService,
    pub places: Option<PlacesService>,
    pub suggestions: SuggestionService,
    pub weather: WeatherService,
    pub music: MusicService,
    pub app_url: Option<String>,
}
