use std::collections::HashMap;

use futures::{future::join_all, stream, StreamExt};
use thiserror::Error;
use tracing::{info, warn};
use urlencoding::encode;

use crate::{
    services::{
        geo::{
            detour_label, detour_minutes, distance_to_route_km, max_deviation_km, sample_route,
            within_detour_budget,
        },
        geocoding::geocoding_service::GeocodingService,
        narrative::{
            narrative_service::NarrativeService,
            prompt::NarrativePromptInput,
            types::{narrative_error::NarrativeError, narrative_payload::RawSuggestion},
        },
        places::{
            places_service::{photo_path, PlacesService, TextSearchInput},
            scoring::{
                build_search_terms, location_label, review_description, PlaceAggregator,
                PriceBounds, ScoredPlace,
            },
        },
    },
    types::{
        app_config::SuggestionSource,
        category::Category,
        coordinate::Coordinate,
        suggestion::{BudgetRange, Suggestion, FALLBACK_LOCATION_LABEL},
    },
};

pub const MIN_SUGGESTIONS: usize = 3;
pub const MAX_SUGGESTIONS: usize = 12;
const PLACES_SAMPLE_POINTS: usize = 4;
const NARRATIVE_SAMPLE_POINTS: usize = 8;
const PLACES_SEARCH_RADIUS_M: u32 = 8000;
const PLACES_SEARCH_CONCURRENCY: usize = 4;
/// Generated candidates geocoded beyond the target count.
const NARRATIVE_GEOCODE_EXTRA: usize = 5;

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("Suggestions require GOOGLE_PLACES_API_KEY (or GROQ_API_KEY/OPENAI_API_KEY)")]
    NotConfigured,
    #[error("Every places search failed")]
    PlacesUnavailable,
    #[error(transparent)]
    Narrative(#[from] NarrativeError),
}

/// Validated input of one suggestions call.
#[derive(Debug, Clone)]
pub struct SuggestionRequest {
    pub start: String,
    pub end: String,
    pub count: usize,
    pub categories: Vec<Category>,
    pub route: Vec<Coordinate>,
    pub max_deviation_minutes: f64,
    pub subcategories: HashMap<Category, Vec<String>>,
    pub budgets: HashMap<Category, BudgetRange>,
}

impl SuggestionRequest {
    pub fn clamp_count(requested: usize) -> usize {
        requested.clamp(MIN_SUGGESTIONS, MAX_SUGGESTIONS)
    }
}

#[derive(Clone)]
pub struct SuggestionService {
    geocoding: GeocodingService,
    places: Option<PlacesService>,
    narrative: Option<NarrativeService>,
    source: SuggestionSource,
}

struct NarrativeCandidate {
    name: String,
    category: String,
    location: String,
    description: String,
    query: String,
}

impl From<RawSuggestion> for NarrativeCandidate {
    fn from(raw: RawSuggestion) -> Self {
        let name = raw.name.unwrap_or_default().trim().to_string();
        let location = raw.location.unwrap_or_default().trim().to_string();
        let query = if location.is_empty() {
            name.clone()
        } else {
            format!("{}, {}", name, location)
        };

        NarrativeCandidate {
            name,
            category: raw.category.unwrap_or_else(|| "Unknown".to_string()),
            location,
            description: raw.description.unwrap_or_default(),
            query,
        }
    }
}

fn with_detour(mut suggestion: Suggestion, at: Option<Coordinate>, route: &[Coordinate]) -> Suggestion {
    if let Some(c) = at {
        let minutes = detour_minutes(distance_to_route_km(c, route));
        suggestion.lat = Some(c.lat);
        suggestion.lon = Some(c.lon);
        suggestion.detour_minutes = Some(minutes);
        suggestion.detour_label = Some(detour_label(minutes));
    }
    suggestion
}

fn place_suggestion(scored: ScoredPlace, route: &[Coordinate]) -> Suggestion {
    let at = scored.coordinate();
    let place = scored.place;

    let suggestion = Suggestion {
        name: place.name.clone().unwrap_or_default(),
        category: scored.category.to_string(),
        location: location_label(place.formatted_address.as_deref())
            .unwrap_or_else(|| FALLBACK_LOCATION_LABEL.to_string()),
        description: review_description(place.rating, place.user_ratings_total),
        rating: place.rating,
        user_ratings_total: place.user_ratings_total,
        url: place
            .place_id
            .as_ref()
            .map(|id| format!("https://www.google.com/maps/place/?q=place_id:{}", id)),
        image_url: place.photos.first().map(|p| photo_path(&p.photo_reference)),
        lat: None,
        lon: None,
        detour_minutes: None,
        detour_label: None,
    };

    with_detour(suggestion, at, route)
}

impl SuggestionService {
    pub fn new(
        geocoding: GeocodingService,
        places: Option<PlacesService>,
        narrative: Option<NarrativeService>,
        source: SuggestionSource,
    ) -> Self {
        Self {
            geocoding,
            places,
            narrative,
            source,
        }
    }

    pub async fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<Suggestion>, SuggestionError> {
        match (self.source, &self.places, &self.narrative) {
            (SuggestionSource::Auto | SuggestionSource::Places, Some(places), _) => {
                self.from_places(places, request).await
            }
            (SuggestionSource::Auto | SuggestionSource::Narrative, _, Some(narrative)) => {
                self.from_narrative(narrative, request).await
            }
            _ => Err(SuggestionError::NotConfigured),
        }
    }

    async fn from_places(
        &self,
        places: &PlacesService,
        request: &SuggestionRequest,
    ) -> Result<Vec<Suggestion>, SuggestionError> {
        let samples = sample_route(&request.route, PLACES_SAMPLE_POINTS);
        let terms = build_search_terms(&request.categories, &request.subcategories);

        let searches: Vec<_> = samples
            .iter()
            .flat_map(|&origin| terms.iter().cloned().map(move |term| (origin, term)))
            .collect();
        let total = searches.len();

        // buffered keeps request order so ranking is deterministic
        let results: Vec<_> = stream::iter(searches)
            .map(|(origin, term)| async move {
                let found = places
                    .text_search(TextSearchInput {
                        query: &term.query,
                        place_type: Some(term.place_type),
                        location: origin,
                        radius_m: PLACES_SEARCH_RADIUS_M,
                    })
                    .await;
                (term.category, found)
            })
            .buffered(PLACES_SEARCH_CONCURRENCY)
            .collect()
            .await;

        let mut aggregator = PlaceAggregator::new();
        let mut failures = 0;
        for (category, found) in results {
            match found {
                Ok(found) => {
                    let bounds = request
                        .budgets
                        .get(&category)
                        .copied()
                        .and_then(PriceBounds::from_budget);
                    for place in found {
                        aggregator.offer(category, place, bounds);
                    }
                }
                Err(e) => {
                    failures += 1;
                    warn!("Places search for {} failed: {}", category, e);
                }
            }
        }

        if total > 0 && failures == total {
            return Err(SuggestionError::PlacesUnavailable);
        }

        info!(
            searches = total,
            failures,
            candidates = aggregator.len(),
            "places search finished"
        );

        let max_km = max_deviation_km(request.max_deviation_minutes);
        Ok(aggregator
            .into_ranked(&request.route, max_km, request.count)
            .into_iter()
            .map(|p| place_suggestion(p, &request.route))
            .collect())
    }

    async fn from_narrative(
        &self,
        narrative: &NarrativeService,
        request: &SuggestionRequest,
    ) -> Result<Vec<Suggestion>, SuggestionError> {
        let route_sample = sample_route(&request.route, NARRATIVE_SAMPLE_POINTS);

        let generated = narrative
            .generate(&NarrativePromptInput {
                start: &request.start,
                end: &request.end,
                route_sample: &route_sample,
                max_deviation_minutes: request.max_deviation_minutes,
                categories: &request.categories,
                subcategories: &request.subcategories,
                budgets: &request.budgets,
                count: request.count,
            })
            .await?;

        let candidates: Vec<NarrativeCandidate> = generated
            .into_iter()
            .take(request.count + NARRATIVE_GEOCODE_EXTRA)
            .map(NarrativeCandidate::from)
            .collect();

        let fast = join_all(
            candidates
                .iter()
                .map(|c| self.geocoding.geocode_fast(&c.query)),
        )
        .await;

        // the slow provider only allows one call at a time
        let mut located = Vec::with_capacity(candidates.len());
        for (candidate, coordinate) in candidates.into_iter().zip(fast) {
            let coordinate = match coordinate {
                Some(c) => Some(c),
                None => self.geocoding.geocode_slow(&candidate.query).await,
            };
            match coordinate {
                Some(c) => located.push((candidate, c)),
                None => warn!("Could not geocode suggestion \"{}\"", candidate.query),
            }
        }

        let max_km = max_deviation_km(request.max_deviation_minutes);
        let accepted: Vec<(NarrativeCandidate, Coordinate)> = located
            .into_iter()
            .filter(|(_, c)| within_detour_budget(*c, &request.route, max_km))
            .take(request.count)
            .collect();

        let photos: Vec<Option<String>> = match &self.places {
            Some(places) => {
                join_all(
                    accepted
                        .iter()
                        .map(|(candidate, c)| places.find_photo(*c, &candidate.name)),
                )
                .await
            }
            None => vec![None; accepted.len()],
        };

        Ok(accepted
            .into_iter()
            .zip(photos)
            .map(|((candidate, c), image_url)| {
                let suggestion = Suggestion {
                    url: Some(format!(
                        "https://www.google.com/maps/search/?api=1&query={}",
                        encode(&candidate.query)
                    )),
                    name: candidate.name,
                    category: candidate.category,
                    location: if candidate.location.is_empty() {
                        FALLBACK_LOCATION_LABEL.to_string()
                    } else {
                        candidate.location
                    },
                    description: candidate.description,
                    rating: None,
                    user_ratings_total: None,
                    image_url,
                    lat: None,
                    lon: None,
                    detour_minutes: None,
                    detour_label: None,
                };
                with_detour(suggestion, Some(c), &request.route)
            })
            .collect())
    }
}
