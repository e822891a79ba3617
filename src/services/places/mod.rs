pub mod places_service;
pub mod scoring;
pub mod types;
