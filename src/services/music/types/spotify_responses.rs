use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
pub struct SpotifyTokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct SpotifyImage {
    pub url: String,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct SpotifyAlbum {
    pub name: Option<String>,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Deserialize, Serialize, Clone, Default)]
pub struct SpotifyExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct SpotifyTrack {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    pub album: Option<SpotifyAlbum>,
    #[serde(default)]
    pub external_urls: SpotifyExternalUrls,
}

#[derive(Deserialize, Serialize)]
pub struct SpotifyCurrentlyPlaying {
    pub item: Option<SpotifyTrack>,
    pub is_playing: Option<bool>,
}

#[derive(Deserialize, Serialize)]
pub struct SpotifyTopTracksResponse {
    #[serde(default)]
    pub items: Vec<SpotifyTrack>,
}
