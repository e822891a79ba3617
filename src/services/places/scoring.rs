//! Quality, budget and dedup rules for places-search candidates.

use std::collections::HashMap;

use super::types::google_text_search_response::GooglePlaceResult;
use crate::{
    services::geo::within_detour_budget,
    types::{category::Category, coordinate::Coordinate, suggestion::BudgetRange},
};

pub const MIN_RATING: f64 = 3.5;
pub const MIN_REVIEWS: u64 = 20;

/// Quality times popularity, so one 5-star review can't beat thousands of 4.3s.
pub fn score_place(rating: f64, reviews: u64) -> f64 {
    rating * ((reviews + 1) as f64).log10()
}

/// Maps a dollar amount onto the provider's 0-4 price levels.
pub fn price_tier_for_dollars(dollars: f64) -> u8 {
    if dollars <= 10.0 {
        0
    } else if dollars <= 25.0 {
        1
    } else if dollars <= 50.0 {
        1
    } else if dollars <= 100.0 {
        2
    } else if dollars <= 200.0 {
        3
    } else {
        4
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBounds {
    pub min_tier: u8,
    pub max_tier: u8,
}

impl PriceBounds {
    /// Negative amounts mean "no preference", so such a budget filters nothing.
    pub fn from_budget(budget: BudgetRange) -> Option<Self> {
        if budget.min < 0.0 || budget.max < 0.0 {
            return None;
        }
        Some(PriceBounds {
            min_tier: price_tier_for_dollars(budget.min),
            max_tier: price_tier_for_dollars(budget.max),
        })
    }
}

pub fn passes_quality_floor(place: &GooglePlaceResult) -> bool {
    let has_identity = place.place_id.as_deref().is_some_and(|id| !id.is_empty());
    let has_name = place.name.as_deref().is_some_and(|n| !n.is_empty());

    has_identity
        && has_name
        && place.rating.unwrap_or(0.0) >= MIN_RATING
        && place.user_ratings_total.unwrap_or(0) >= MIN_REVIEWS
}

/// Places without price data are never excluded by budget.
pub fn within_price_bounds(place: &GooglePlaceResult, bounds: Option<PriceBounds>) -> bool {
    match (bounds, place.price_level) {
        (Some(b), Some(level)) => (b.min_tier..=b.max_tier).contains(&level),
        _ => true,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchTerm {
    pub category: Category,
    pub query: String,
    pub place_type: &'static str,
}

/// One term per sub-type, or the bare category term when none were picked.
pub fn build_search_terms(
    categories: &[Category],
    subcategories: &HashMap<Category, Vec<String>>,
) -> Vec<SearchTerm> {
    let mut terms = Vec::new();

    for &category in categories {
        let subs: Vec<&str> = subcategories
            .get(&category)
            .map(|s| {
                s.iter()
                    .map(|sub| sub.trim())
                    .filter(|sub| !sub.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if subs.is_empty() {
            terms.push(SearchTerm {
                category,
                query: category.query_term().to_string(),
                place_type: category.place_type(),
            });
            continue;
        }

        for sub in subs {
            terms.push(SearchTerm {
                category,
                query: format!("{} {}", sub, category.query_term()),
                place_type: category.place_type(),
            });
        }
    }

    terms
}

#[derive(Debug, Clone)]
pub struct ScoredPlace {
    pub place: GooglePlaceResult,
    pub category: Category,
    pub score: f64,
}

impl ScoredPlace {
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.place
            .geometry
            .as_ref()
            .and_then(|g| g.location)
            .map(|l| Coordinate::new(l.lng, l.lat))
    }
}

/// Collects candidates across sample points and search terms, keeping the
/// best-scored entry per place id in first-seen order.
#[derive(Default)]
pub struct PlaceAggregator {
    entries: Vec<ScoredPlace>,
    index: HashMap<String, usize>,
}

impl PlaceAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer(
        &mut self,
        category: Category,
        place: GooglePlaceResult,
        bounds: Option<PriceBounds>,
    ) {
        if !passes_quality_floor(&place) || !within_price_bounds(&place, bounds) {
            return;
        }

        let Some(id) = place.place_id.clone() else {
            return;
        };
        let score = score_place(
            place.rating.unwrap_or(0.0),
            place.user_ratings_total.unwrap_or(0),
        );
        let candidate = ScoredPlace {
            place,
            category,
            score,
        };

        match self.index.get(&id) {
            Some(&i) if self.entries[i].score < score => self.entries[i] = candidate,
            Some(_) => {}
            None => {
                self.index.insert(id, self.entries.len());
                self.entries.push(candidate);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Applies the detour filter (places without geometry pass), sorts by
    /// score descending and keeps `count`.
    pub fn into_ranked(self, route: &[Coordinate], max_deviation_km: f64, count: usize) -> Vec<ScoredPlace> {
        let mut ranked: Vec<ScoredPlace> = self
            .entries
            .into_iter()
            .filter(|p| {
                p.coordinate()
                    .map_or(true, |c| within_detour_budget(c, route, max_deviation_km))
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(count);
        ranked
    }
}

/// City-ish label: the address components before the country.
pub fn location_label(formatted_address: Option<&str>) -> Option<String> {
    let address = formatted_address?.trim();
    if address.is_empty() {
        return None;
    }

    let parts: Vec<&str> = address.split(',').collect();
    let start = parts.len().saturating_sub(3);
    let end = parts.len().saturating_sub(1);

    let city = if start < end {
        parts[start..end].join(",").trim().to_string()
    } else {
        String::new()
    };

    if city.is_empty() {
        Some(address.to_string())
    } else {
        Some(city)
    }
}

pub fn review_description(rating: Option<f64>, reviews: Option<u64>) -> String {
    match (rating, reviews) {
        (Some(r), Some(n)) if r > 0.0 && n > 0 => {
            format!("{:.1} ★ · {} Google reviews", r, with_thousands(n))
        }
        _ => "Highly rated on Google".to_string(),
    }
}

fn with_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
