use std::{env::VarError, net::SocketAddr, str::FromStr, time::Duration};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Where suggestions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionSource {
    /// Places search when a places key is set, otherwise text generation.
    Auto,
    Places,
    Narrative,
}

impl FromStr for SuggestionSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SuggestionSource::Auto),
            "places" => Ok(SuggestionSource::Places),
            "narrative" => Ok(SuggestionSource::Narrative),
            other => Err(format!(
                "expected auto, places or narrative, got \"{}\"",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderHosts {
    pub nominatim: String,
    pub photon: String,
    pub openrouteservice: String,
    pub osrm: String,
    pub google: String,
    pub open_meteo: String,
    pub groq: String,
    pub openai: String,
    pub spotify_accounts: String,
    pub spotify_api: String,
}

impl Default for ProviderHosts {
    fn default() -> Self {
        ProviderHosts {
            nominatim: "https://nominatim.openstreetmap.org".to_string(),
            photon: "https://photon.komoot.io".to_string(),
            openrouteservice: "https://api.openrouteservice.org".to_string(),
            osrm: "https://router.project-osrm.org".to_string(),
            google: "https://maps.googleapis.com".to_string(),
            open_meteo: "https://api.open-meteo.com".to_string(),
            groq: "https://api.groq.com/openai/v1".to_string(),
            openai: "https://api.openai.com/v1".to_string(),
            spotify_accounts: "https://accounts.spotify.com".to_string(),
            spotify_api: "https://api.spotify.com".to_string(),
        }
    }
}

impl ProviderHosts {
    /// Points every provider at the same host.
    #[cfg(test)]
    pub fn all(host: &str) -> Self {
        ProviderHosts {
            nominatim: host.to_string(),
            photon: host.to_string(),
            openrouteservice: host.to_string(),
            osrm: host.to_string(),
            google: host.to_string(),
            open_meteo: host.to_string(),
            groq: host.to_string(),
            openai: host.to_string(),
            spotify_accounts: host.to_string(),
            spotify_api: host.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpotifyCredentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub hosts: ProviderHosts,
    pub openrouteservice_key: Option<String>,
    pub google_places_key: Option<String>,
    pub groq_key: Option<String>,
    pub openai_key: Option<String>,
    pub spotify: SpotifyCredentials,
    pub app_url: Option<String>,
    pub routing_prefer_ors: bool,
    pub suggestion_source: SuggestionSource,
    pub nominatim_min_interval: Duration,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::build_from_lookup(|key| std::env::var(key))
    }

    /// Parsing is decoupled from the real environment so tests can feed a map.
    pub fn build_from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        // blank values count as unset
        let optional = |var: &str| -> Option<String> {
            lookup(var)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let or_default = |var: &str, default: &str| -> String {
            optional(var).unwrap_or_else(|| default.to_string())
        };

        let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason,
        };

        let bind_addr = or_default("BIND_ADDR", "0.0.0.0:3000")
            .parse::<SocketAddr>()
            .map_err(|e| invalid("BIND_ADDR", e.to_string()))?;

        let routing_prefer_ors = match or_default("ROUTING_PREFER_ORS", "true")
            .to_ascii_lowercase()
            .as_str()
        {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            other => {
                return Err(invalid(
                    "ROUTING_PREFER_ORS",
                    format!("expected a boolean, got \"{}\"", other),
                ))
            }
        };

        let suggestion_source = or_default("SUGGESTION_SOURCE", "auto")
            .parse::<SuggestionSource>()
            .map_err(|e| invalid("SUGGESTION_SOURCE", e))?;

        let nominatim_min_interval = or_default("NOMINATIM_MIN_INTERVAL_MS", "1100")
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| invalid("NOMINATIM_MIN_INTERVAL_MS", e.to_string()))?;

        let defaults = ProviderHosts::default();
        let hosts = ProviderHosts {
            nominatim: or_default("NOMINATIM_HOST", &defaults.nominatim),
            photon: or_default("PHOTON_HOST", &defaults.photon),
            openrouteservice: or_default("OPENROUTESERVICE_HOST", &defaults.openrouteservice),
            osrm: or_default("OSRM_HOST", &defaults.osrm),
            google: or_default("GOOGLE_MAPS_HOST", &defaults.google),
            open_meteo: or_default("OPEN_METEO_HOST", &defaults.open_meteo),
            groq: or_default("GROQ_HOST", &defaults.groq),
            openai: or_default("OPENAI_BASE_URL", &defaults.openai),
            spotify_accounts: or_default("SPOTIFY_ACCOUNTS_HOST", &defaults.spotify_accounts),
            spotify_api: or_default("SPOTIFY_API_HOST", &defaults.spotify_api),
        };

        Ok(AppConfig {
            bind_addr,
            log_level: or_default("RUST_LOG", "info"),
            hosts,
            openrouteservice_key: optional("OPENROUTESERVICE_API_KEY"),
            google_places_key: optional("GOOGLE_PLACES_API_KEY")
                .or_else(|| optional("GOOGLE_MAPS_API_KEY")),
            groq_key: optional("GROQ_API_KEY"),
            openai_key: optional("OPENAI_API_KEY"),
            spotify: SpotifyCredentials {
                client_id: optional("SPOTIFY_CLIENT_ID"),
                client_secret: optional("SPOTIFY_CLIENT_SECRET"),
                refresh_token: optional("SPOTIFY_REFRESH_TOKEN"),
            },
            app_url: optional("APP_URL"),
            routing_prefer_ors,
            suggestion_source,
            nominatim_min_interval,
        })
    }

    /// Config with no credentials, every provider pointed at `host`.
    #[cfg(test)]
    pub fn with_host(host: &str) -> Self {
        AppConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            log_level: "info".to_string(),
            hosts: ProviderHosts::all(host),
            openrouteservice_key: None,
            google_places_key: None,
            groq_key: None,
            openai_key: None,
            spotify: SpotifyCredentials::default(),
            app_url: None,
            routing_prefer_ors: true,
            suggestion_source: SuggestionSource::Auto,
            nominatim_min_interval: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Result<String, VarError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = AppConfig::build_from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.hosts.osrm, "https://router.project-osrm.org");
        assert_eq!(config.nominatim_min_interval, Duration::from_millis(1100));
        assert_eq!(config.suggestion_source, SuggestionSource::Auto);
        assert!(config.routing_prefer_ors);
        assert!(config.google_places_key.is_none());
    }

    #[test]
    fn blank_keys_count_as_missing_and_maps_key_is_a_fallback() {
        let config = AppConfig::build_from_lookup(lookup_from(&[
            ("GOOGLE_PLACES_API_KEY", "   "),
            ("GOOGLE_MAPS_API_KEY", "maps-key"),
            ("GROQ_API_KEY", ""),
        ]))
        .unwrap();

        assert_eq!(config.google_places_key.as_deref(), Some("maps-key"));
        assert!(config.groq_key.is_none());
    }

    #[test]
    fn invalid_values_are_reported_with_the_variable() {
        let err = AppConfig::build_from_lookup(lookup_from(&[("SUGGESTION_SOURCE", "magic")]))
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar { ref var, .. } if var == "SUGGESTION_SOURCE"
        ));

        assert!(AppConfig::build_from_lookup(lookup_from(&[("BIND_ADDR", "nope")])).is_err());
        assert!(
            AppConfig::build_from_lookup(lookup_from(&[("ROUTING_PREFER_ORS", "maybe")]))
                .is_err()
        );
    }
}
