//! Great-circle distance helpers.

use crate::order::Coordinate;

/// Mean Earth radius used by every distance in the planner, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometres.
///
/// Sequencing tie-breaks depend on the exact value, so the formula is kept
/// in its textbook form: `a = sin²(Δφ/2) + cos φ1 · cos φ2 · sin²(Δλ/2)`,
/// `c = 2 · atan2(√a, √(1−a))`.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin() * (d_lng / 2.0).sin();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Length of each consecutive leg along `path`, in kilometres.
pub fn leg_distances_km(path: &[Coordinate]) -> Vec<f64> {
    path.windows(2)
        .map(|pair| haversine_km(pair[0], pair[1]))
        .collect()
}

/// Sum of leg lengths; `0.0` (never `-0.0`) when there are no legs.
pub fn total_km(legs: &[f64]) -> f64 {
    legs.iter().fold(0.0, |acc, leg| acc + leg)
}

/// Total length of `path`, in kilometres.
pub fn path_distance_km(path: &[Coordinate]) -> f64 {
    total_km(&leg_distances_km(path))
}
