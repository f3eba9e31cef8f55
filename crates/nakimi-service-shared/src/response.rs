//! Response wrapper for successful HTTP responses.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Wrapper for successful responses with content type metadata.
///
/// This provides symmetry with `ProblemDetails` by including content type
/// information in the response body.
///
/// # Example
///
/// ```
/// use nakimi_service_shared::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct LinkResult {
///     url: String,
///     waypoints: usize,
/// }
///
/// let result = LinkResult {
///     url: "https://www.google.com/maps/dir/?api=1&origin=A&destination=B".to_string(),
///     waypoints: 0,
/// };
/// let response = ServiceResponse::new(result);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    /// The actual response payload.
    #[serde(flatten)]
    pub data: T,

    /// Content type for this response.
    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    /// Create a new successful response with the default content type.
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
        }
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

/// Implement IntoResponse for axum to return ServiceResponse as HTTP responses.
impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nakimi_lib::{Coordinate, SequenceStrategy, SequencedRoute, Stop};

    #[test]
    fn test_sequenced_route_is_flattened() {
        let route = SequencedRoute {
            strategy: SequenceStrategy::NearestNeighbor,
            order: vec![Stop::new("PED-1", "Moneda 1137", Coordinate::new(-33.443, -70.654))],
            path: vec![Coordinate::new(-33.443, -70.654)],
            unpositioned: Vec::new(),
        };
        let json = serde_json::to_string(&ServiceResponse::new(route)).unwrap();

        assert!(json.contains("\"strategy\":\"nearest-neighbor\""));
        assert!(json.contains("\"content_type\":\"application/json\""));
        assert!(!json.contains("\"data\":{"));
        assert!(!json.contains("unpositioned"));
    }

    #[test]
    fn test_response_from_trait() {
        let response: ServiceResponse<Vec<String>> = vec!["PED-1".to_string()].into();
        assert_eq!(response.data, vec!["PED-1".to_string()]);
        assert_eq!(response.content_type, "application/json");
    }
}
