//! Health check handlers for Kubernetes probes.
//!
//! Provides `/health/live` and `/health/ready` endpoints that return JSON
//! status responses for Kubernetes liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or "not_ready: <reason>".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Waypoint limit applied to navigation links (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_waypoints: Option<usize>,

    /// Unresolved-address policy in effect (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved_policy: Option<String>,
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            max_waypoints: None,
            unresolved_policy: None,
        }
    }

    /// Create a ready status with planner settings.
    pub fn ready(service: &str, version: &str, max_waypoints: usize, policy: &str) -> Self {
        Self {
            max_waypoints: Some(max_waypoints),
            unresolved_policy: Some(policy.to_string()),
            ..Self::alive(service, version)
        }
    }

    /// Create a not-ready status.
    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            ..Self::alive(service, version)
        }
    }
}

/// Liveness probe handler.
///
/// Returns 200 OK if the service is running.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"nakimi-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Returns 200 OK when the planner configuration is usable, 503 otherwise.
///
/// ```text
/// GET /health/ready
/// {"status":"ok","service":"nakimi-service-shared","version":"0.1.0","max_waypoints":23,"unresolved_policy":"mark-invalid"}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");
    let planner = state.planner();

    if let Err(error) = planner.validate() {
        let status = HealthStatus::not_ready(service, version, &error.to_string());
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus::ready(
        service,
        version,
        planner.max_waypoints,
        &planner.unresolved_policy.to_string(),
    );
    (StatusCode::OK, Json(status)).into_response()
}
