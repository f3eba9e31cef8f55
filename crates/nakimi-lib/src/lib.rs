//! Nakimi route planner library entry points.
//!
//! This crate validates delivery orders, sequences the resulting stops with a
//! nearest-neighbor heuristic, and turns an ordered stop list into a Google
//! Maps multi-stop navigation link. Higher-level consumers (CLI, HTTP service)
//! should only depend on the functions exported here instead of reimplementing
//! behavior.
//!

#![deny(warnings)]

pub mod config;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod ingest;
pub mod navigation;
pub mod order;
pub mod plan;
pub mod sequencing;
pub mod validation;

pub use config::PlannerConfig;
pub use error::{Error, InvalidRouteError, Result};
pub use geo::{haversine_km, leg_distances_km, path_distance_km, total_km, EARTH_RADIUS_KM};
pub use geocode::{
    parse_nominatim_response, resolve_address, resolve_order, resolve_orders, try_resolve_address,
    Geocoder, NominatimGeocoder, ResolutionSource, StaticGeocoder, UnresolvedPolicy,
    DEFAULT_NOMINATIM_URL, SANTIAGO_CENTER,
};
pub use ingest::{load_orders, load_orders_csv, load_orders_json, read_orders_csv};
pub use navigation::{
    encode_component, generate_url, NavigationLinkBuilder, GOOGLE_MAPS_DIR_URL, MAX_WAYPOINTS,
};
pub use order::{Coordinate, DeliveryStatus, Endpoint, Order, Stop};
pub use plan::{
    driver_manifest, mark_delivered, plan_delivery, DeliveryPlan, DriverManifest, PlanRequest,
    PlanSummary, RejectedOrder, Route,
};
pub use sequencing::{
    select_sequencer, sequence, ManualSequencer, NearestNeighborSequencer, SequenceStrategy,
    SequencedRoute, StopSequencer,
};
pub use validation::{apply_validation, validate, ValidationError, ValidationResult};
