use std::{sync::Arc, time::Duration};

use tracing::warn;

use super::providers::{
    GeocodeProvider, NominatimGeocoder, OpenRouteServiceGeocoder, PhotonGeocoder, PlaceLabel,
    GEOCODE_TIMEOUT,
};
use crate::{
    services::{
        fallback::{FallbackLog, ProviderOutcome},
        throttle::Throttle,
    },
    types::{app_config::AppConfig, coordinate::Coordinate},
};

const SEARCH_LIMIT: u8 = 8;
/// Longest an autocomplete request queues behind other rate-limited calls.
const SEARCH_PERMIT_WAIT: Duration = Duration::from_secs(3);

/// Resolves free text to a coordinate through an ordered provider chain:
/// the fast providers first, then the rate-limited one behind a throttle.
#[derive(Clone)]
pub struct GeocodingService {
    fast: Vec<Arc<dyn GeocodeProvider>>,
    slow: Arc<dyn GeocodeProvider>,
    throttle: Throttle,
    nominatim: NominatimGeocoder,
}

impl GeocodingService {
    pub fn new(config: &AppConfig, client: reqwest::Client) -> Self {
        let nominatim = NominatimGeocoder::new(config.hosts.nominatim.clone(), client.clone());

        let mut fast: Vec<Arc<dyn GeocodeProvider>> = Vec::new();
        if let Some(key) = &config.openrouteservice_key {
            fast.push(Arc::new(OpenRouteServiceGeocoder::new(
                config.hosts.openrouteservice.clone(),
                key.clone(),
                client.clone(),
            )));
        }
        fast.push(Arc::new(PhotonGeocoder::new(
            config.hosts.photon.clone(),
            client,
        )));

        Self {
            fast,
            slow: Arc::new(nominatim.clone()),
            throttle: Throttle::new(config.nominatim_min_interval),
            nominatim,
        }
    }

    /// Replaces the provider chain, keeping autocomplete on Nominatim.
    pub fn with_providers(
        mut self,
        fast: Vec<Arc<dyn GeocodeProvider>>,
        slow: Arc<dyn GeocodeProvider>,
    ) -> Self {
        self.fast = fast;
        self.slow = slow;
        self
    }

    /// Full chain. `None` when no provider could place the query.
    pub async fn geocode(&self, query: &str) -> Option<Coordinate> {
        self.resolve(query).await.found()
    }

    /// Full chain, keeping apart "nobody matched" and "every provider failed".
    pub async fn resolve(&self, query: &str) -> ProviderOutcome<Coordinate> {
        let mut log = FallbackLog::new();

        for provider in &self.fast {
            if let Some(c) = log.attempt(provider.name(), call(provider.as_ref(), query).await) {
                return ProviderOutcome::Found(c);
            }
        }

        if let Some(c) = log.attempt(self.slow.name(), self.call_slow(query).await) {
            return ProviderOutcome::Found(c);
        }

        let outcome = log.finish();
        if let ProviderOutcome::Failed(reason) = &outcome {
            warn!(query, %reason, "every geocoding provider failed");
        }
        outcome
    }

    pub async fn geocode_fast(&self, query: &str) -> Option<Coordinate> {
        let mut log = FallbackLog::new();

        for provider in &self.fast {
            if let Some(c) = log.attempt(provider.name(), call(provider.as_ref(), query).await) {
                return Some(c);
            }
        }

        None
    }

    /// Rate-limited provider only. Concurrent callers are serialized.
    pub async fn geocode_slow(&self, query: &str) -> Option<Coordinate> {
        self.call_slow(query).await.found()
    }

    async fn call_slow(&self, query: &str) -> ProviderOutcome<Coordinate> {
        let _permit = self.throttle.acquire().await;
        call(self.slow.as_ref(), query).await
    }

    /// Autocomplete suggestions. Failures degrade to an empty list.
    pub async fn search(&self, query: &str) -> Vec<PlaceLabel> {
        let Ok(_permit) = tokio::time::timeout(SEARCH_PERMIT_WAIT, self.throttle.acquire()).await
        else {
            warn!("Location search gave up waiting for the rate limiter");
            return Vec::new();
        };

        self.nominatim
            .search(query, SEARCH_LIMIT)
            .await
            .unwrap_or_else(|e| {
                warn!("Location search failed: {}", e);
                Vec::new()
            })
    }
}

async fn call(provider: &dyn GeocodeProvider, query: &str) -> ProviderOutcome<Coordinate> {
    match tokio::time::timeout(GEOCODE_TIMEOUT, provider.geocode(query)).await {
        Ok(outcome) => outcome,
        Err(_) => ProviderOutcome::Failed("timed out".to_string()),
    }
}
