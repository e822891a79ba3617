use std::sync::Arc;

use tracing::{info, warn};

use super::{
    providers::{OpenRouteServiceRouter, OsrmRouter, Profile, RouteProvider},
    types::route_response::RouteResponse,
};
use crate::{
    services::{
        fallback::{FallbackLog, ProviderOutcome},
        geo::likely_crosses_water,
    },
    types::{app_config::AppConfig, coordinate::Coordinate},
};

pub const ROUTING_UNAVAILABLE_MESSAGE: &str =
    "Routing service unavailable. Try again later, or add OPENROUTESERVICE_API_KEY for a reliable fallback.";

#[derive(Clone)]
pub struct RoutingService {
    providers: Vec<Arc<dyn RouteProvider>>,
}

impl RoutingService {
    /// Provider order: OpenRouteService first when keyed and preferred, then
    /// OSRM, then OpenRouteService if it has not been tried yet.
    pub fn new(config: &AppConfig, client: reqwest::Client) -> Self {
        let ors = config.openrouteservice_key.as_ref().map(|key| {
            Arc::new(OpenRouteServiceRouter::new(
                config.hosts.openrouteservice.clone(),
                key.clone(),
                client.clone(),
            )) as Arc<dyn RouteProvider>
        });
        let osrm: Arc<dyn RouteProvider> =
            Arc::new(OsrmRouter::new(config.hosts.osrm.clone(), client));

        let providers = match ors {
            Some(ors) if config.routing_prefer_ors => vec![ors, osrm],
            Some(ors) => vec![osrm, ors],
            None => vec![osrm],
        };

        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// `Found` with up to three alternatives, `NotFound` when a provider
    /// answered that no path exists, `Failed` when every provider broke.
    pub async fn route(
        &self,
        waypoints: &[Coordinate],
        profile: Profile,
    ) -> ProviderOutcome<RouteResponse> {
        let mut log = FallbackLog::new();

        for provider in &self.providers {
            let outcome = provider.route(waypoints, profile).await;
            if let Some(route) = log.attempt(provider.name(), outcome) {
                info!(provider = provider.name(), routes = route.routes.len(), "route found");
                return ProviderOutcome::Found(route);
            }
        }

        let outcome = log.finish();
        if let ProviderOutcome::Failed(reason) = &outcome {
            warn!(%reason, "every routing provider failed");
        }
        outcome
    }
}

/// User-facing explanation for a route that providers answered but could not find.
pub fn no_route_message(from: Coordinate, to: Coordinate) -> String {
    if likely_crosses_water(from, to) {
        "No drivable route found. These places appear to be separated by an ocean or other \
         impassable water, so they can't be connected by road."
            .to_string()
    } else {
        "Could not find a route between these locations. Try different locations or mode."
            .to_string()
    }
}
