pub mod narrative_service;
pub mod prompt;
pub mod types;
