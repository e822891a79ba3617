use std::{str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::error;
use urlencoding::encode;

use super::types::{
    music_service_error::MusicServiceError,
    spotify_responses::{
        SpotifyCurrentlyPlaying, SpotifyTokenResponse, SpotifyTopTracksResponse, SpotifyTrack,
    },
};
use crate::types::app_config::{AppConfig, SpotifyCredentials};

const MUSIC_TIMEOUT: Duration = Duration::from_secs(10);
const SCOPES: &str = "user-read-currently-playing user-read-playback-state user-top-read";
pub const MAX_TOP_TRACKS: u8 = 20;
pub const DEFAULT_TOP_TRACKS: u8 = 8;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    ShortTerm,
    #[default]
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

impl FromStr for TimeRange {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short_term" => Ok(TimeRange::ShortTerm),
            "medium_term" => Ok(TimeRange::MediumTerm),
            "long_term" => Ok(TimeRange::LongTerm),
            _ => Err(()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub playing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album: Option<String>,
    pub image_url: Option<String>,
    pub url: Option<String>,
}

fn artists(track: &SpotifyTrack, fallback: &str) -> String {
    if track.artists.is_empty() {
        return fallback.to_string();
    }
    track
        .artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn cover(track: &SpotifyTrack) -> Option<String> {
    track
        .album
        .as_ref()
        .and_then(|a| a.images.first())
        .map(|i| i.url.clone())
}

#[derive(Clone)]
pub struct MusicService {
    credentials: SpotifyCredentials,
    accounts_host: String,
    api_host: String,
    client: reqwest::Client,
}

impl MusicService {
    pub fn new(config: &AppConfig, client: reqwest::Client) -> Self {
        Self {
            credentials: config.spotify.clone(),
            accounts_host: config.hosts.spotify_accounts.clone(),
            api_host: config.hosts.spotify_api.clone(),
            client,
        }
    }

    fn client_credentials(&self) -> Result<(&str, &str), MusicServiceError> {
        match (&self.credentials.client_id, &self.credentials.client_secret) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            (id, secret) => {
                let mut missing = Vec::new();
                if id.is_none() {
                    missing.push("SPOTIFY_CLIENT_ID");
                }
                if secret.is_none() {
                    missing.push("SPOTIFY_CLIENT_SECRET");
                }
                Err(MusicServiceError::NotConfigured(missing))
            }
        }
    }

    async fn access_token(&self) -> Result<String, MusicServiceError> {
        let credentials = self.client_credentials();
        let (id, secret, refresh_token) = match (credentials, &self.credentials.refresh_token) {
            (Ok((id, secret)), Some(token)) => (id, secret, token),
            (Ok(_), None) => {
                return Err(MusicServiceError::NotConfigured(vec!["SPOTIFY_REFRESH_TOKEN"]))
            }
            (Err(MusicServiceError::NotConfigured(mut missing)), token) => {
                if token.is_none() {
                    missing.push("SPOTIFY_REFRESH_TOKEN");
                }
                return Err(MusicServiceError::NotConfigured(missing));
            }
            (Err(e), _) => return Err(e),
        };

        let resp = self
            .client
            .post(format!("{}/api/token", self.accounts_host))
            .basic_auth(id, Some(secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .timeout(MUSIC_TIMEOUT)
            .send()
            .await?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!("Spotify token error: {}", body);
            return Err(MusicServiceError::TokenRejected(body));
        }

        Ok(resp.json::<SpotifyTokenResponse>().await?.access_token)
    }

    pub async fn now_playing(&self) -> Result<NowPlaying, MusicServiceError> {
        let token = self.access_token().await?;

        let resp = self
            .client
            .get(format!("{}/v1/me/player/currently-playing", self.api_host))
            .bearer_auth(token)
            .timeout(MUSIC_TIMEOUT)
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::NO_CONTENT || !resp.status().is_success() {
            return Ok(NowPlaying::default());
        }

        let data = resp.json::<SpotifyCurrentlyPlaying>().await?;
        let Some(item) = data.item else {
            return Ok(NowPlaying::default());
        };

        Ok(NowPlaying {
            playing: data.is_playing.unwrap_or(true),
            artist: Some(artists(&item, "Unknown Artist")),
            image_url: cover(&item),
            album: item.album.as_ref().and_then(|a| a.name.clone()),
            url: item.external_urls.spotify.clone(),
            track: Some(item.name),
        })
    }

    pub async fn top_tracks(
        &self,
        range: TimeRange,
        limit: u8,
    ) -> Result<Vec<TopTrack>, MusicServiceError> {
        let token = self.access_token().await?;

        let resp = self
            .client
            .get(format!(
                "{}/v1/me/top/tracks?time_range={}&limit={}",
                self.api_host,
                range.as_str(),
                limit.clamp(1, MAX_TOP_TRACKS)
            ))
            .bearer_auth(token)
            .timeout(MUSIC_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(MusicServiceError::InsufficientScope);
        }
        if !status.is_success() {
            return Err(MusicServiceError::Status(status));
        }

        Ok(resp
            .json::<SpotifyTopTracksResponse>()
            .await?
            .items
            .into_iter()
            .map(|t| TopTrack {
                artist: artists(&t, "Unknown"),
                image_url: cover(&t),
                album: t.album.as_ref().and_then(|a| a.name.clone()),
                url: t.external_urls.spotify.clone(),
                id: t.id,
                name: t.name,
            })
            .collect())
    }

    /// Authorization page to send the site owner to. `None` without a client id.
    pub fn authorize_url(&self, redirect_uri: &str) -> Option<String> {
        let client_id = self.credentials.client_id.as_ref()?;

        Some(format!(
            "{}/authorize?client_id={}&response_type=code&redirect_uri={}&scope={}&show_dialog=true",
            self.accounts_host,
            encode(client_id),
            encode(redirect_uri),
            encode(SCOPES)
        ))
    }

    /// Trades an authorization code for a refresh token.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<Option<String>, MusicServiceError> {
        let (id, secret) = self.client_credentials()?;

        let resp = self
            .client
            .post(format!("{}/api/token", self.accounts_host))
            .basic_auth(id, Some(secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .timeout(MUSIC_TIMEOUT)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(MusicServiceError::TokenRejected(
                resp.text().await.unwrap_or_default(),
            ));
        }

        Ok(resp.json::<SpotifyTokenResponse>().await?.refresh_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(host: &str) -> MusicService {
        let mut config = AppConfig::with_host(host);
        config.spotify = SpotifyCredentials {
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            refresh_token: Some("refresh".to_string()),
        };
        MusicService::new(&config, reqwest::Client::new())
    }

    #[tokio::test]
    async fn reports_every_missing_credential() {
        let service = MusicService::new(
            &AppConfig::with_host("http://127.0.0.1:9"),
            reqwest::Client::new(),
        );

        match service.now_playing().await {
            Err(MusicServiceError::NotConfigured(missing)) => assert_eq!(
                missing,
                vec![
                    "SPOTIFY_CLIENT_ID",
                    "SPOTIFY_CLIENT_SECRET",
                    "SPOTIFY_REFRESH_TOKEN"
                ]
            ),
            _ => panic!("expected NotConfigured"),
        }
    }

    #[tokio::test]
    async fn now_playing_refreshes_token_then_reads_player() {
        let mut server = mockito::Server::new_async().await;
        let token = server
            .mock("POST", "/api/token")
            // base64("id:secret")
            .match_header("authorization", "Basic aWQ6c2VjcmV0")
            .match_body(mockito::Matcher::UrlEncoded(
                "grant_type".to_string(),
                "refresh_token".to_string(),
            ))
            .with_body(r#"{"access_token":"access"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v1/me/player/currently-playing")
            .match_header("authorization", "Bearer access")
            .with_body(
                r#"{"is_playing":true,"item":{"name":"Song","artists":[{"name":"A"},{"name":"B"}],"album":{"name":"LP","images":[{"url":"http://img/1"}]},"external_urls":{"spotify":"http://open/track"}}}"#,
            )
            .create_async()
            .await;

        let playing = configured(&server.url()).now_playing().await.unwrap();

        token.assert_async().await;
        assert_eq!(
            playing,
            NowPlaying {
                playing: true,
                track: Some("Song".to_string()),
                artist: Some("A, B".to_string()),
                album: Some("LP".to_string()),
                image_url: Some("http://img/1".to_string()),
                url: Some("http://open/track".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn nothing_playing_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/token")
            .with_body(r#"{"access_token":"access"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v1/me/player/currently-playing")
            .with_status(204)
            .create_async()
            .await;

        let playing = configured(&server.url()).now_playing().await.unwrap();
        assert!(!playing.playing);
        assert_eq!(serde_json::to_string(&playing).unwrap(), r#"{"playing":false}"#);
    }

    #[tokio::test]
    async fn top_tracks_scope_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/token")
            .with_body(r#"{"access_token":"access"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v1/me/top/tracks")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("time_range".to_string(), "long_term".to_string()),
                mockito::Matcher::UrlEncoded("limit".to_string(), "20".to_string()),
            ]))
            .with_status(403)
            .create_async()
            .await;

        let err = configured(&server.url())
            .top_tracks(TimeRange::LongTerm, 50)
            .await
            .unwrap_err();

        assert!(matches!(err, MusicServiceError::InsufficientScope));
    }

    #[test]
    fn authorize_url_requests_scopes() {
        let url = configured("https://accounts.example")
            .authorize_url("http://127.0.0.1:3000/api/music/callback")
            .unwrap();

        assert!(url.starts_with("https://accounts.example/authorize?client_id=id"));
        assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A3000%2Fapi%2Fmusic%2Fcallback"));
        assert!(url.contains("scope=user-read-currently-playing%20user-read-playback-state%20user-top-read"));
    }
}
