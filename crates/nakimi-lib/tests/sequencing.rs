mod common;

use common::{santiago_stops, CENTRO_LOGISTICO};
use nakimi_lib::{
    haversine_km, select_sequencer, sequence, Coordinate, SequenceStrategy, Stop,
};

#[test]
fn santiago_run_from_distribution_centre() {
    let stops = santiago_stops();
    let route = sequence(&stops, Some(CENTRO_LOGISTICO), None);

    assert_eq!(
        route.stop_ids(),
        vec!["PED-1005", "PED-1002", "PED-1004", "PED-1001", "PED-1003"]
    );
    assert_eq!(route.path.len(), 6);
    assert_eq!(route.path[0], CENTRO_LOGISTICO);
    assert!(route.unpositioned.is_empty());
}

#[test]
fn santiago_run_without_origin_starts_at_first_stop() {
    let stops = santiago_stops();
    let route = sequence(&stops, None, None);

    assert_eq!(
        route.stop_ids(),
        vec!["PED-1001", "PED-1002", "PED-1004", "PED-1005", "PED-1003"]
    );
    assert_eq!(route.path.len(), 5);
    assert_eq!(route.path[0], stops[0].coordinates);
}

#[test]
fn destination_closes_the_path() {
    let stops = santiago_stops();
    let route = sequence(&stops, Some(CENTRO_LOGISTICO), Some(CENTRO_LOGISTICO));

    assert_eq!(route.order.len(), 5);
    assert_eq!(route.path.len(), 7);
    assert_eq!(route.path.last(), Some(&CENTRO_LOGISTICO));
}

#[test]
fn every_hop_is_the_nearest_remaining_stop() {
    let stops = santiago_stops();
    let route = sequence(&stops, Some(CENTRO_LOGISTICO), None);

    let mut position = CENTRO_LOGISTICO;
    let mut remaining: Vec<&Stop> = stops.iter().collect();
    for visited in &route.order {
        let chosen = haversine_km(position, visited.coordinates);
        for candidate in &remaining {
            assert!(chosen <= haversine_km(position, candidate.coordinates));
        }
        remaining.retain(|stop| stop.id != visited.id);
        position = visited.coordinates;
    }
    assert!(remaining.is_empty());
}

#[test]
fn total_distance_is_sum_of_hops() {
    let stops = santiago_stops();
    let route = sequence(&stops, Some(CENTRO_LOGISTICO), None);

    let expected: f64 = route
        .path
        .windows(2)
        .map(|pair| haversine_km(pair[0], pair[1]))
        .sum();
    assert!((route.total_distance_km() - expected).abs() < 1e-9);
    assert!(route.total_distance_km() > 0.0);
}

#[test]
fn sequencing_is_deterministic() {
    let stops = santiago_stops();
    let first = sequence(&stops, Some(CENTRO_LOGISTICO), None);
    for _ in 0..10 {
        assert_eq!(sequence(&stops, Some(CENTRO_LOGISTICO), None), first);
    }
}

#[test]
fn single_stop_is_trivial() {
    let stop = Stop::new("PED-1", "Moneda 1137", Coordinate::new(-33.443, -70.654));
    let route = sequence(std::slice::from_ref(&stop), None, None);
    assert_eq!(route.stop_ids(), vec!["PED-1"]);
    assert_eq!(route.path, vec![stop.coordinates]);
    assert_eq!(route.total_distance_km(), 0.0);
}

#[test]
fn unresolved_stops_never_reach_the_path() {
    let mut stops = santiago_stops();
    let lost = Stop::new("PED-0", "Sin ubicación", Coordinate::UNRESOLVED);
    stops.insert(2, lost);
    let route = sequence(&stops, Some(CENTRO_LOGISTICO), None);

    assert_eq!(route.order.len(), 5);
    assert_eq!(route.unpositioned, vec!["PED-0".to_string()]);
    assert!(route.path.iter().all(|c| c.is_resolved()));
}

#[test]
fn manual_strategy_keeps_sheet_order() {
    let stops = santiago_stops();
    let route =
        select_sequencer(SequenceStrategy::Manual).sequence(&stops, Some(CENTRO_LOGISTICO), None);
    assert_eq!(
        route.stop_ids(),
        vec!["PED-1001", "PED-1002", "PED-1003", "PED-1004", "PED-1005"]
    );
    let nearest = sequence(&stops, Some(CENTRO_LOGISTICO), None);
    assert!(route.total_distance_km() > nearest.total_distance_km());
}
