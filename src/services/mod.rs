pub mod fallback;
pub mod geo;
pub mod geocoding;
pub mod music;
pub mod narrative;
pub mod places;
pub mod routing;
pub mod suggestions;
pub mod throttle;
pub mod weather;
