pub mod music_service;
pub mod types;
