//! Delivery orders, stops, and the coordinates attached to them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::validation::ValidationError;

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Placeholder written by upstream collaborators when geocoding failed.
    pub const UNRESOLVED: Coordinate = Coordinate { lat: 0.0, lng: 0.0 };

    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` when the coordinate can take part in distance computations.
    ///
    /// `(0,0)` is the "unresolved" marker and non-finite values come from
    /// broken sheet cells; neither is a real delivery location.
    pub fn is_resolved(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite() && !(self.lat == 0.0 && self.lng == 0.0)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Delivery progress tracked by the driver view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    #[serde(alias = "PENDIENTE", alias = "pendiente")]
    Pending,
    #[serde(alias = "ENTREGADO", alias = "entregado")]
    Delivered,
}

/// Clamp a raw demand figure into the `u32` range.
pub(crate) fn clamp_demand(raw: f64) -> u32 {
    raw.max(0.0).min(u32::MAX as f64) as u32
}

fn deserialize_demand<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.map_or(0, clamp_demand))
}

/// A delivery unit as produced by order ingestion.
///
/// `is_valid` and `validation_errors` are derived by the validator and are
/// never read from input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "cliente")]
    pub customer_name: Option<String>,
    #[serde(default, alias = "telefono")]
    pub phone: Option<String>,
    #[serde(default, alias = "direccion")]
    pub address: Option<String>,
    /// Units to deliver; negative input clamps to 0, fractions truncate.
    #[serde(default, deserialize_with = "deserialize_demand")]
    pub demand: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinate>,
    #[serde(default, alias = "estado")]
    pub status: DeliveryStatus,
    #[serde(default, skip_deserializing)]
    pub is_valid: bool,
    #[serde(default, skip_deserializing)]
    pub validation_errors: Vec<ValidationError>,
}

impl Order {
    /// Convenience constructor for a fully-populated order without coordinates.
    pub fn new(
        id: impl Into<String>,
        customer_name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            customer_name: Some(customer_name.into()),
            phone: Some(phone.into()),
            address: Some(address.into()),
            ..Self::default()
        }
    }

    /// Attach coordinates to the order.
    pub fn with_coordinates(mut self, coordinates: Coordinate) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// `true` when the order carries a usable position.
    pub fn has_resolved_coordinates(&self) -> bool {
        self.coordinates.is_some_and(|c| c.is_resolved())
    }

    /// Identifier for log lines and reports, even when the id is missing.
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("<no id>")
    }
}

/// The subset of an order the sequencer and link builder work with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    pub address: String,
    pub coordinates: Coordinate,
}

impl Stop {
    pub fn new(id: impl Into<String>, address: impl Into<String>, coordinates: Coordinate) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            coordinates,
        }
    }

    /// Build a stop from a validated order.
    ///
    /// Returns `None` for invalid orders. A valid order without coordinates
    /// yields a stop at [`Coordinate::UNRESOLVED`]; the sequencer skips it but
    /// its address can still be used as a waypoint.
    pub fn from_order(order: &Order) -> Option<Self> {
        if !order.is_valid {
            return None;
        }
        Some(Self {
            id: order.id.clone()?,
            address: order.address.as_deref()?.trim().to_string(),
            coordinates: order.coordinates.unwrap_or(Coordinate::UNRESOLVED),
        })
    }
}

/// Fixed start or end of a route: a free-text address or a resolved position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
    Coordinate(Coordinate),
    Address(String),
}

impl Endpoint {
    /// Position usable by the sequencer, if this endpoint has one.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Endpoint::Coordinate(c) if c.is_resolved() => Some(*c),
            _ => None,
        }
    }

    /// Text handed to the navigation provider (`lat,lng` for positions).
    pub fn as_query(&self) -> String {
        match self {
            Endpoint::Coordinate(c) => c.to_string(),
            Endpoint::Address(address) => address.clone(),
        }
    }
}

impl From<Coordinate> for Endpoint {
    fn from(value: Coordinate) -> Self {
        Endpoint::Coordinate(value)
    }
}

impl From<&str> for Endpoint {
    fn from(value: &str) -> Self {
        Endpoint::Address(value.to_string())
    }
}

impl From<String> for Endpoint {
    fn from(value: String) -> Self {
        Endpoint::Address(value)
    }
}
