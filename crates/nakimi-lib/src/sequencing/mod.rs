//! Stop sequencing for a single delivery run.
//!
//! This module provides:
//! - [`SequenceStrategy`] - Supported ways of ordering stops
//! - [`SequencedRoute`] - Visiting order plus the polyline a map layer draws
//! - [`sequence`] - Nearest-neighbor entry point
//!
//! # Strategy Pattern
//!
//! Each strategy is a [`StopSequencer`] implementation; [`select_sequencer`]
//! maps a [`SequenceStrategy`] to its sequencer so callers never match on the
//! strategy themselves.
//!
//! # Example
//!
//! ```
//! use nakimi_lib::{sequence, Coordinate, Stop};
//!
//! let stops = vec![
//!     Stop::new("A", "Moneda 1137", Coordinate::new(-33.4430, -70.6540)),
//!     Stop::new("B", "Av. Apoquindo 4500", Coordinate::new(-33.4140, -70.5830)),
//! ];
//! let route = sequence(&stops, None, None);
//! assert_eq!(route.stop_ids(), vec!["A", "B"]);
//! ```

mod strategy;

pub use strategy::{select_sequencer, ManualSequencer, NearestNeighborSequencer, StopSequencer};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geo::path_distance_km;
use crate::order::{Coordinate, Stop};

/// Supported sequencing strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequenceStrategy {
    /// Greedy nearest-neighbor from the starting point.
    #[default]
    NearestNeighbor,
    /// Keep the operator's order (drag-and-drop).
    Manual,
}

impl fmt::Display for SequenceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SequenceStrategy::NearestNeighbor => "nearest-neighbor",
            SequenceStrategy::Manual => "manual",
        };
        f.write_str(value)
    }
}

impl FromStr for SequenceStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest-neighbor" | "nearest_neighbor" | "nn" => Ok(SequenceStrategy::NearestNeighbor),
            "manual" => Ok(SequenceStrategy::Manual),
            other => Err(format!("unknown sequence strategy '{other}'")),
        }
    }
}

/// Visiting order produced by a sequencer.
///
/// `path` starts with the origin when one was given, then one coordinate per
/// entry of `order`, then the destination when one was given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequencedRoute {
    pub strategy: SequenceStrategy,
    pub order: Vec<Stop>,
    pub path: Vec<Coordinate>,
    /// Ids of stops left out because they had no usable position.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unpositioned: Vec<String>,
}

impl SequencedRoute {
    /// Stop ids in visiting order.
    pub fn stop_ids(&self) -> Vec<&str> {
        self.order.iter().map(|stop| stop.id.as_str()).collect()
    }

    /// Length of the rendered path in kilometres.
    pub fn total_distance_km(&self) -> f64 {
        path_distance_km(&self.path)
    }

    /// Number of hops along the path.
    pub fn leg_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Order `stops` with the nearest-neighbor heuristic.
///
/// Without an origin the first input stop is the start. The origin and the
/// destination only ever appear in `path`. Ties go to the stop that comes
/// first in the input, so identical input always yields identical output.
pub fn sequence(
    stops: &[Stop],
    origin: Option<Coordinate>,
    destination: Option<Coordinate>,
) -> SequencedRoute {
    NearestNeighborSequencer.sequence(stops, origin, destination)
}

/// Split stops into those with a usable position and the ids of the rest.
fn partition_positioned(stops: &[Stop]) -> (Vec<&Stop>, Vec<String>) {
    let mut positioned = Vec::with_capacity(stops.len());
    let mut unpositioned = Vec::new();
    for stop in stops {
        if stop.coordinates.is_resolved() {
            positioned.push(stop);
        } else {
            tracing::warn!(stop = %stop.id, "skipping stop without resolved coordinates");
            unpositioned.push(stop.id.clone());
        }
    }
    (positioned, unpositioned)
}

/// Drop endpoints that carry the unresolved marker.
fn usable_endpoint(endpoint: Option<Coordinate>, role: &'static str) -> Option<Coordinate> {
    match endpoint {
        Some(c) if c.is_resolved() => Some(c),
        Some(_) => {
            tracing::warn!(role, "ignoring unresolved route endpoint");
            None
        }
        None => None,
    }
}
