pub mod music_service_error;
pub mod spotify_responses;
