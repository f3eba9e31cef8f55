//! Request types and validation for HTTP endpoints.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use nakimi_lib::{Coordinate, Order, SequenceStrategy, Stop};

use crate::ProblemDetails;

/// Most orders or stops accepted in one request.
pub const MAX_ITEMS_PER_REQUEST: usize = 500;

/// Validation trait for request types.
///
/// Implementations should validate all fields and return a `ProblemDetails`
/// error for invalid input.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

fn too_many(field: &str, count: usize, request_id: &str) -> Option<Box<ProblemDetails>> {
    (count > MAX_ITEMS_PER_REQUEST).then(|| {
        Box::new(ProblemDetails::bad_request(
            format!(
                "The '{}' field holds {} entries; at most {} are accepted",
                field, count, MAX_ITEMS_PER_REQUEST
            ),
            request_id,
        ))
    })
}

/// Request for validating a batch of orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateOrdersRequest {
    pub orders: Vec<Order>,
}

impl Validate for ValidateOrdersRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        match too_many("orders", self.orders.len(), request_id) {
            Some(problem) => Err(problem),
            None => Ok(()),
        }
    }
}

/// Request for sequencing stops (the `/api/vrp` endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VrpRequest {
    pub stops: Vec<Stop>,

    /// Fixed start; never counted as a stop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Coordinate>,

    /// Fixed end; never counted as a stop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Coordinate>,

    /// Sequencing strategy; the service default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<SequenceStrategy>,
}

impl Validate for VrpRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if let Some(problem) = too_many("stops", self.stops.len(), request_id) {
            return Err(problem);
        }

        let mut seen = HashSet::with_capacity(self.stops.len());
        for stop in &self.stops {
            if stop.id.trim().is_empty() {
                return Err(Box::new(ProblemDetails::bad_request(
                    "Every stop needs a non-empty 'id'",
                    request_id,
                )));
            }
            if !seen.insert(stop.id.as_str()) {
                return Err(Box::new(ProblemDetails::bad_request(
                    format!("Stop id '{}' appears more than once", stop.id),
                    request_id,
                )));
            }
        }

        Ok(())
    }
}

/// Request for a navigation link.
///
/// Carries no checks of its own: the link builder is the single authority on
/// what makes a route invalid, so every rejection is an invalid route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRequest {
    #[serde(default)]
    pub origin: String,

    #[serde(default)]
    pub destination: String,

    #[serde(default)]
    pub waypoints: Vec<String>,
}

/// Request for the driver's manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverRequest {
    pub orders: Vec<Order>,

    /// Round-trip start and end; the configured depot when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depot: Option<String>,
}

impl Validate for DriverRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if let Some(problem) = too_many("orders", self.orders.len(), request_id) {
            return Err(problem);
        }
        if self.depot.as_deref().map(str::trim) == Some("") {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'depot' field cannot be blank",
                request_id,
            )));
        }
        Ok(())
    }
}

/// Request for geocoding a single address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeRequest {
    pub address: String,
}

impl Validate for GeocodeRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.address.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'address' field is required and cannot be empty",
                request_id,
            )));
        }
        Ok(())
    }
}
