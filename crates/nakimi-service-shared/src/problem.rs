//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Provides structured error responses following the Problem Details standard.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use nakimi_lib::{Error as LibError, InvalidRouteError};

/// Problem type URI for navigation links that cannot be built.
pub const PROBLEM_INVALID_ROUTE: &str = "/problems/invalid-route";

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for addresses the geocoder could not place.
pub const PROBLEM_GEOCODING_FAILED: &str = "/problems/geocoding-failed";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// RFC 9457 Problem Details response structure.
///
/// Provides a consistent format for error responses across all endpoints.
///
/// # Example
///
/// ```
/// use nakimi_service_shared::{ProblemDetails, PROBLEM_INVALID_ROUTE};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_INVALID_ROUTE,
///     "Invalid Route",
///     StatusCode::UNPROCESSABLE_ENTITY,
/// )
/// .with_detail("waypoint limit exceeded: max 23, got 24")
/// .with_request_id("req-12345");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (e.g., request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Content type for this response (always "application/problem+json").
    pub content_type: String,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            content_type: "application/problem+json".to_string(),
        }
    }

    /// Add a detailed explanation of this specific problem occurrence.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// Create a 400 Bad Request problem for invalid input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 422 Unprocessable Entity problem for a link that cannot be built.
    ///
    /// The detail is the operator-facing message of the route error.
    pub fn invalid_route(error: &InvalidRouteError, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_ROUTE,
            "Invalid Route",
            StatusCode::UNPROCESSABLE_ENTITY,
        )
        .with_detail(error.to_string())
        .with_request_id(request_id)
    }

    /// Create a 404 Not Found problem for an address without coordinates.
    pub fn address_not_found(address: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_GEOCODING_FAILED,
            "Geocoding Failed",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!("Unable to resolve coordinates for '{}'", address))
        .with_request_id(request_id)
    }

    /// Create a 502 Bad Gateway problem when the geocoding service misbehaves.
    pub fn geocoder_unavailable(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_GEOCODING_FAILED,
            "Geocoding Failed",
            StatusCode::BAD_GATEWAY,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 500 Internal Server Error problem.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

/// Implement IntoResponse for axum to return ProblemDetails as HTTP responses.
impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// The `request_id` must be provided separately since library errors don't have it.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::InvalidRoute(route_error) => {
            ProblemDetails::invalid_route(route_error, request_id)
        }
        LibError::Geocoding { .. } | LibError::Http(_) => {
            ProblemDetails::geocoder_unavailable(error.to_string(), request_id)
        }
        LibError::MissingColumn { .. }
        | LibError::InvalidOrderRecord { .. }
        | LibError::UnsupportedOrderFile { .. }
        | LibError::Csv(_)
        | LibError::Json(_) => ProblemDetails::bad_request(error.to_string(), request_id),
        _ => ProblemDetails::internal_error(error.to_string(), request_id),
    }
}
