//! Test utilities for handler testing.
//!
//! The state built here never touches the network: geocoding is answered
//! from a fixed table of Santiago addresses.

use std::sync::Arc;

use nakimi_lib::{Coordinate, Error, Geocoder, Result, StaticGeocoder, UnresolvedPolicy};

use crate::state::{AppState, ServiceConfig};

/// Known addresses and positions served by [`test_geocoder`].
pub mod fixture_addresses {
    use nakimi_lib::Coordinate;

    /// Distribution centre.
    pub const DEPOT: &str = "Centro Logístico";
    pub const DEPOT_POSITION: Coordinate = Coordinate::new(-33.45, -70.66);

    pub const MONEDA: &str = "Moneda 1137, Santiago";
    pub const MONEDA_POSITION: Coordinate = Coordinate::new(-33.443, -70.654);

    pub const APOQUINDO: &str = "Av. Apoquindo 4500, Las Condes";
    pub const APOQUINDO_POSITION: Coordinate = Coordinate::new(-33.41, -70.57);
}

/// Offline geocoder knowing the [`fixture_addresses`].
pub fn test_geocoder() -> StaticGeocoder {
    use fixture_addresses::*;

    StaticGeocoder::new()
        .with(DEPOT, DEPOT_POSITION)
        .with(MONEDA, MONEDA_POSITION)
        .with(APOQUINDO, APOQUINDO_POSITION)
}

/// Geocoder whose backend is always down.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableGeocoder;

impl Geocoder for UnavailableGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>> {
        Err(Error::Geocoding {
            address: address.to_string(),
            message: "service unavailable".to_string(),
        })
    }
}

/// State with default planner settings and the offline geocoder.
pub fn test_state() -> AppState {
    test_state_with(ServiceConfig::default())
}

/// State with the given settings and the offline geocoder.
pub fn test_state_with(config: ServiceConfig) -> AppState {
    AppState::from_components(config, Arc::new(test_geocoder()))
}

/// State whose unresolved addresses fall back to `center`.
pub fn test_state_with_fallback(center: Coordinate) -> AppState {
    let mut config = ServiceConfig::default();
    config.planner.unresolved_policy = UnresolvedPolicy::CityCenter { center };
    test_state_with(config)
}

/// State whose geocoder fails every lookup.
pub fn test_state_with_unavailable_geocoder() -> AppState {
    AppState::from_components(ServiceConfig::default(), Arc::new(UnavailableGeocoder))
}

/// State with `depot` configured as the driver's round-trip endpoint.
pub fn test_state_with_depot(depot: &str) -> AppState {
    let mut config = ServiceConfig::default();
    config.planner.depot = Some(depot.to_string());
    test_state_with(config)
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocoder_knows_fixture_addresses() {
        let geocoder = test_geocoder();
        assert_eq!(
            geocoder.geocode(fixture_addresses::MONEDA).unwrap(),
            Some(fixture_addresses::MONEDA_POSITION)
        );
        assert_eq!(geocoder.geocode("Unknown 1").unwrap(), None);
    }

    #[test]
    fn test_state_uses_offline_geocoder() {
        let state = test_state();
        assert_eq!(
            state.geocoder().geocode(fixture_addresses::DEPOT).unwrap(),
            Some(fixture_addresses::DEPOT_POSITION)
        );
    }

    #[test]
    fn test_unavailable_geocoder_always_errors() {
        let lookup = UnavailableGeocoder.geocode(fixture_addresses::MONEDA);
        assert!(lookup.is_err());
    }

    #[test]
    fn test_request_id_unique() {
        assert_ne!(test_request_id(), test_request_id());
    }
}
