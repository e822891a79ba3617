//! Great-circle helpers used to keep suggestions close to the route.

use crate::types::coordinate::Coordinate;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Speed used to convert between detour time and distance.
pub const ASSUMED_SPEED_KMH: f64 = 50.0;

/// Straight-line distance above which a failed route is explained as a water crossing.
pub const WATER_CROSSING_KM: f64 = 1500.0;

const SEGMENT_SAMPLES: u32 = 5;

pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Minimum distance from `point` to the polyline, sampling each segment at
/// t = 0, 0.2, ..., 1.0. Returns infinity for routes with fewer than two points.
pub fn distance_to_route_km(point: Coordinate, route: &[Coordinate]) -> f64 {
    if route.len() < 2 {
        return f64::INFINITY;
    }

    route
        .windows(2)
        .flat_map(|segment| {
            let (from, to) = (segment[0], segment[1]);
            (0..=SEGMENT_SAMPLES).map(move |j| {
                let t = f64::from(j) / f64::from(SEGMENT_SAMPLES);
                Coordinate::new(
                    from.lon + t * (to.lon - from.lon),
                    from.lat + t * (to.lat - from.lat),
                )
            })
        })
        .map(|sample| haversine_km(point, sample))
        .fold(f64::INFINITY, f64::min)
}

/// Evenly spaced interior points of the route, at most `max_points` of them.
pub fn sample_route(route: &[Coordinate], max_points: usize) -> Vec<Coordinate> {
    if route.len() <= max_points {
        return route.to_vec();
    }

    let step = route.len() / (max_points + 1);
    (1..=max_points)
        .map(|i| route[(i * step).min(route.len() - 1)])
        .collect()
}

/// One-way distance allowed off the route for a round-trip detour budget.
pub fn max_deviation_km(round_trip_minutes: f64) -> f64 {
    (round_trip_minutes / 60.0 * ASSUMED_SPEED_KMH) / 2.0
}

/// Round-trip minutes needed to reach a point `one_way_km` off the route.
pub fn detour_minutes(one_way_km: f64) -> u32 {
    (2.0 * one_way_km / ASSUMED_SPEED_KMH * 60.0).round().max(0.0) as u32
}

pub fn detour_label(minutes: u32) -> String {
    if minutes <= 3 {
        return "~5 min".to_string();
    }

    let lo = minutes / 5 * 5;
    let hi = minutes.div_ceil(5) * 5;

    if lo == hi {
        format!("~{} min", lo)
    } else {
        format!("{}–{} min", lo, hi)
    }
}

pub fn within_detour_budget(point: Coordinate, route: &[Coordinate], max_km: f64) -> bool {
    distance_to_route_km(point, route) <= max_km
}

pub fn likely_crosses_water(from: Coordinate, to: Coordinate) -> bool {
    haversine_km(from, to) > WATER_CROSSING_KM
}
