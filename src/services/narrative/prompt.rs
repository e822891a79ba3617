use std::collections::HashMap;

use crate::types::{category::Category, coordinate::Coordinate, suggestion::BudgetRange};

pub const SYSTEM_PROMPT: &str = "You are a travel advisor. Given a road trip route, suggest \
interesting places to stop along the way. Return ONLY valid JSON, no other text.";

/// Extra candidates requested on top of the target count, since some get
/// filtered out by geocoding and distance.
pub const OVERSHOOT: usize = 3;

const BUDGET_CEILING: f64 = 500.0;

pub struct NarrativePromptInput<'a> {
    pub start: &'a str,
    pub end: &'a str,
    pub route_sample: &'a [Coordinate],
    pub max_deviation_minutes: f64,
    pub categories: &'a [Category],
    pub subcategories: &'a HashMap<Category, Vec<String>>,
    pub budgets: &'a HashMap<Category, BudgetRange>,
    pub count: usize,
}

fn sorted<V>(map: &HashMap<Category, V>) -> Vec<(&Category, &V)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by_key(|(category, _)| **category);
    entries
}

fn dollars(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("${}", amount as i64)
    } else {
        format!("${:.2}", amount)
    }
}

fn subcategory_hint(subcategories: &HashMap<Category, Vec<String>>) -> String {
    let parts: Vec<String> = sorted(subcategories)
        .into_iter()
        .filter(|(_, subs)| !subs.is_empty())
        .map(|(category, subs)| format!("{}: {}", category, subs.join(", ")))
        .collect();

    if parts.is_empty() {
        return String::new();
    }
    format!(
        "\nPreferred types within each category (prioritize these when possible): {}",
        parts.join("; ")
    )
}

fn budget_hint(budgets: &HashMap<Category, BudgetRange>) -> String {
    let parts: Vec<String> = sorted(budgets)
        .into_iter()
        .map(|(category, b)| {
            let max = if b.max >= BUDGET_CEILING {
                format!("{}+", dollars(BUDGET_CEILING))
            } else {
                dollars(b.max)
            };
            format!("{}: {}–{}", category, dollars(b.min), max)
        })
        .collect();

    if parts.is_empty() {
        return String::new();
    }
    format!(
        "\nBudget per stop (typical cost for one person): {}",
        parts.join("; ")
    )
}

pub fn user_prompt(input: &NarrativePromptInput<'_>) -> String {
    let route_sample = input
        .route_sample
        .iter()
        .map(|c| format!("{:.4},{:.4}", c.lat, c.lon))
        .collect::<Vec<_>>()
        .join(" | ");
    let categories = input
        .categories
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Route: {start} → {end}

Midpoints along the route (lat,lon): {route_sample}

The user is willing to go up to {minutes} minutes off the main route. Suggest only places that are a reasonable detour.{budget}

Suggest {requested} places to visit along this route (we filter by distance). Mix of categories: {categories}.{subs}

For each suggestion include:
- name: string (place/attraction/restaurant name)
- category: string (one of: {categories})
- location: string (city/region, e.g. \"Washington, DC\" or \"Virginia\")
- description: string (1-2 sentences why it's worth a stop)

Return a JSON object like:
{{\"suggestions\":[{{\"name\":\"...\",\"category\":\"...\",\"location\":\"...\",\"description\":\"...\"}}]}}",
        start = input.start,
        end = input.end,
        route_sample = route_sample,
        minutes = input.max_deviation_minutes,
        budget = budget_hint(input.budgets),
        requested = input.count + OVERSHOOT,
        categories = categories,
        subs = subcategory_hint(input.subcategories),
    )
}
