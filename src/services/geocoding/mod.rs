pub mod geocoding_service;
pub mod providers;
pub mod types;
