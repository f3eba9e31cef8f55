// Module exports for CLI subcommands
//
// Each module handles one subcommand; main.rs parses arguments and dispatches.

pub mod driver;
pub mod link;
pub mod plan;
pub mod sequence;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use nakimi_lib::{load_orders, Coordinate, Endpoint, Order};

/// Load and validate the orders in `path` (`.csv` or `.json`).
pub fn read_orders(path: &Path) -> Result<Vec<Order>> {
    let orders = load_orders(path)
        .with_context(|| format!("failed to load orders from {}", path.display()))?;
    tracing::info!(path = %path.display(), orders = orders.len(), "orders loaded");
    Ok(orders)
}

/// Interpret a command-line endpoint: `lat,lng` becomes a position, anything
/// else an address.
pub fn parse_endpoint(value: &str) -> Endpoint {
    let mut parts = value.split(',');
    if let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next()) {
        if let (Ok(lat), Ok(lng)) = (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) {
            let coordinate = Coordinate::new(lat, lng);
            if coordinate.is_resolved() {
                return Endpoint::Coordinate(coordinate);
            }
        }
    }
    Endpoint::Address(value.to_string())
}

/// Build a position from an optional `lat`/`lng` pair.
pub fn coordinate_from(lat: Option<f64>, lng: Option<f64>) -> Option<Coordinate> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
        _ => None,
    }
}
