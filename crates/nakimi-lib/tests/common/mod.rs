//! Shared fixtures for the library integration tests.

use std::path::PathBuf;

use nakimi_lib::{Coordinate, Stop};

/// Distribution centre used as the fixed start of fixture routes.
#[allow(dead_code)]
pub const CENTRO_LOGISTICO: Coordinate = Coordinate::new(-33.45, -70.66);

/// Path to the fixtures directory shared by every crate.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Path to the sample order sheet.
#[allow(dead_code)]
pub fn orders_csv() -> PathBuf {
    fixtures_dir().join("orders.csv")
}

/// The five positioned Santiago stops of `orders.csv`, in sheet order.
#[allow(dead_code)]
pub fn santiago_stops() -> Vec<Stop> {
    vec![
        Stop::new(
            "PED-1001",
            "Av. Apoquindo 4500, Las Condes",
            Coordinate::new(-33.41, -70.57),
        ),
        Stop::new(
            "PED-1002",
            "Av. Providencia 1234, Depto 501, Providencia",
            Coordinate::new(-33.43, -70.61),
        ),
        Stop::new(
            "PED-1003",
            "Av. Pajaritos 2000, Maipú",
            Coordinate::new(-33.51, -70.76),
        ),
        Stop::new(
            "PED-1004",
            "Irarrázaval 3000, Ñuñoa",
            Coordinate::new(-33.456, -70.598),
        ),
        Stop::new(
            "PED-1005",
            "Av. Libertador Bernardo O'Higgins 3300, Estación Central",
            Coordinate::new(-33.452, -70.68),
        ),
    ]
}

/// `count` distinct waypoint addresses.
#[allow(dead_code)]
pub fn waypoints(count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("Calle {n}, Santiago")).collect()
}
