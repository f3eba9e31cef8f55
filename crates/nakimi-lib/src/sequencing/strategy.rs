//! Sequencing strategies implementing the Strategy pattern.
//!
//! This module provides the `StopSequencer` trait and its implementations.
//! New strategies plug in here without touching the planners that call them.

use crate::geo::haversine_km;
use crate::order::{Coordinate, Stop};

use super::{partition_positioned, usable_endpoint, SequenceStrategy, SequencedRoute};

/// Trait for stop sequencing strategies.
pub trait StopSequencer: Send + Sync {
    /// The strategy identifier for this sequencer.
    fn strategy(&self) -> SequenceStrategy;

    /// Order `stops`, optionally anchored at a fixed origin and destination.
    ///
    /// Stops without resolved coordinates are left out of `order` and `path`
    /// and reported in [`SequencedRoute::unpositioned`].
    fn sequence(
        &self,
        stops: &[Stop],
        origin: Option<Coordinate>,
        destination: Option<Coordinate>,
    ) -> SequencedRoute;
}

/// Greedy nearest-neighbor sequencer.
///
/// Repeatedly visits the closest pending stop by haversine distance. Not
/// optimal; deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborSequencer;

impl NearestNeighborSequencer {
    /// Index of the pending stop closest to `position`; first minimum wins.
    fn nearest(position: Coordinate, pending: &[&Stop]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, stop) in pending.iter().enumerate() {
            let distance = haversine_km(position, stop.coordinates);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((index, distance)),
            }
        }
        best.map(|(index, _)| index)
    }
}

impl StopSequencer for NearestNeighborSequencer {
    fn strategy(&self) -> SequenceStrategy {
        SequenceStrategy::NearestNeighbor
    }

    fn sequence(
        &self,
        stops: &[Stop],
        origin: Option<Coordinate>,
        destination: Option<Coordinate>,
    ) -> SequencedRoute {
        let (mut pending, unpositioned) = partition_positioned(stops);
        let mut order: Vec<Stop> = Vec::with_capacity(pending.len());
        let mut path = Vec::with_capacity(pending.len() + 2);

        let mut current = match usable_endpoint(origin, "origin") {
            Some(start) => {
                path.push(start);
                Some(start)
            }
            None if !pending.is_empty() => {
                let first = pending.remove(0);
                path.push(first.coordinates);
                order.push(first.clone());
                Some(first.coordinates)
            }
            None => None,
        };

        while let Some(position) = current {
            let Some(index) = Self::nearest(position, &pending) else {
                break;
            };
            let next = pending.remove(index);
            path.push(next.coordinates);
            order.push(next.clone());
            current = Some(next.coordinates);
        }

        if let Some(end) = usable_endpoint(destination, "destination") {
            path.push(end);
        }

        tracing::debug!(
            stops = order.len(),
            unpositioned = unpositioned.len(),
            "nearest-neighbor sequence computed"
        );

        SequencedRoute {
            strategy: self.strategy(),
            order,
            path,
            unpositioned,
        }
    }
}

/// Keeps stops in the order they were given.
///
/// Used after the operator reorders stops by hand; only the path is built.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualSequencer;

impl StopSequencer for ManualSequencer {
    fn strategy(&self) -> SequenceStrategy {
        SequenceStrategy::Manual
    }

    fn sequence(
        &self,
        stops: &[Stop],
        origin: Option<Coordinate>,
        destination: Option<Coordinate>,
    ) -> SequencedRoute {
        let (positioned, unpositioned) = partition_positioned(stops);

        let path = usable_endpoint(origin, "origin")
            .into_iter()
            .chain(positioned.iter().map(|stop| stop.coordinates))
            .chain(usable_endpoint(destination, "destination"))
            .collect();

        SequencedRoute {
            strategy: self.strategy(),
            order: positioned.into_iter().cloned().collect(),
            path,
            unpositioned,
        }
    }
}

/// Map a strategy to its sequencer.
pub fn select_sequencer(strategy: SequenceStrategy) -> Box<dyn StopSequencer> {
    match strategy {
        SequenceStrategy::NearestNeighbor => Box::new(NearestNeighborSequencer),
        SequenceStrategy::Manual => Box::new(ManualSequencer),
    }
}
