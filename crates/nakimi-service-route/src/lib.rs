//! Handlers and router of the Nakimi route planning service.
//!
//! # Endpoints
//!
//! - `POST /api/validate` - Validate a batch of orders
//! - `POST /api/vrp` - Sequence stops between optional fixed endpoints
//! - `POST /api/link` - Build a Google Maps multi-stop link
//! - `POST /api/geocode` - Resolve one address to coordinates
//! - `POST /api/driver` - Pending stops and the depot round-trip link
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use nakimi_lib::{
    Coordinate, DriverManifest, InvalidRouteError, ResolutionSource, SequenceStrategy, Stop,
    ValidationError, apply_validation, driver_manifest, select_sequencer, try_resolve_address,
    validate,
};
use nakimi_service_shared::{
    AppState, DriverRequest, GeocodeRequest, LinkRequest, MetricsLayer, ProblemDetails, RequestId,
    ServiceResponse, Validate, ValidateOrdersRequest, VrpRequest, from_lib_error, health_live,
    health_ready, metrics_handler, record_geocode_lookup, record_link_generated,
    record_link_rejected, record_route_sequenced, record_route_stops,
};

const SERVICE: &str = "route";

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug)]
pub enum Response<T> {
    Success(ServiceResponse<T>),
    Error(ProblemDetails),
}

impl<T: Serialize> IntoResponse for Response<T> {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            Response::Error(problem) => problem.into_response(),
        }
    }
}

/// Validation outcome for one order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderValidation {
    pub id: Option<String>,
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: usize,
    pub invalid: usize,
    pub results: Vec<OrderValidation>,
}

#[derive(Debug, Serialize)]
pub struct VrpResponse {
    pub strategy: SequenceStrategy,
    pub order: Vec<Stop>,
    pub path: Vec<Coordinate>,
    pub unpositioned: Vec<String>,
    pub total_distance_km: f64,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub url: String,
    pub waypoints: usize,
}

#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub source: ResolutionSource,
}

/// Build the service router around `state`.
pub fn app(state: AppState, metrics_path: &str) -> Router {
    Router::new()
        .route("/api/validate", post(validate_handler))
        .route("/api/vrp", post(vrp_handler))
        .route("/api/link", post(link_handler))
        .route("/api/geocode", post(geocode_handler))
        .route("/api/driver", post(driver_handler))
        .route(metrics_path, get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(MetricsLayer)
        .with_state(state)
}

/// Handle POST /api/validate requests.
async fn validate_handler(
    request_id: RequestId,
    Json(request): Json<ValidateOrdersRequest>,
) -> Response<ValidateResponse> {
    if let Err(problem) = request.validate(request_id.as_str()) {
        return Response::Error(*problem);
    }

    let results: Vec<OrderValidation> = request
        .orders
        .iter()
        .map(|order| {
            let result = validate(order);
            OrderValidation {
                id: order.id.clone(),
                is_valid: result.is_valid,
                errors: result.errors,
            }
        })
        .collect();
    let valid = results.iter().filter(|r| r.is_valid).count();
    let invalid = results.len() - valid;

    info!(request_id = %request_id, valid, invalid, "orders validated");

    Response::Success(ServiceResponse::new(ValidateResponse {
        valid,
        invalid,
        results,
    }))
}

/// Handle POST /api/vrp requests.
async fn vrp_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(request): Json<VrpRequest>,
) -> Response<VrpResponse> {
    if let Err(problem) = request.validate(request_id.as_str()) {
        return Response::Error(*problem);
    }

    let strategy = request.strategy.unwrap_or(state.planner().strategy);
    let route = select_sequencer(strategy).sequence(
        &request.stops,
        request.origin,
        request.destination,
    );

    let strategy_label = strategy.to_string();
    record_route_sequenced(&strategy_label, SERVICE);
    record_route_stops(route.order.len(), &strategy_label);

    let total_distance_km = route.total_distance_km();
    info!(
        request_id = %request_id,
        strategy = %strategy,
        stops = route.order.len(),
        unpositioned = route.unpositioned.len(),
        km = total_distance_km,
        "stops sequenced"
    );

    Response::Success(ServiceResponse::new(VrpResponse {
        strategy,
        order: route.order,
        path: route.path,
        unpositioned: route.unpositioned,
        total_distance_km,
    }))
}

/// Handle POST /api/link requests.
async fn link_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(request): Json<LinkRequest>,
) -> Response<LinkResponse> {
    let built = state.link_builder().build(
        &request.origin,
        &request.destination,
        request.waypoints.as_slice(),
    );

    match built {
        Ok(url) => {
            record_link_generated(SERVICE);
            info!(
                request_id = %request_id,
                waypoints = request.waypoints.len(),
                "navigation link generated"
            );
            Response::Success(ServiceResponse::new(LinkResponse {
                url,
                waypoints: request.waypoints.len(),
            }))
        }
        Err(error) => {
            let reason = match error {
                InvalidRouteError::MissingEndpoints => "missing_endpoints",
                InvalidRouteError::WaypointLimitExceeded { .. } => "waypoint_limit",
            };
            record_link_rejected(reason, SERVICE);
            warn!(request_id = %request_id, %error, "navigation link rejected");
            Response::Error(ProblemDetails::invalid_route(&error, request_id.as_str()))
        }
    }
}

/// Handle POST /api/geocode requests.
///
/// Lookups use a blocking HTTP client, so they run on the blocking pool.
async fn geocode_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(request): Json<GeocodeRequest>,
) -> Response<GeocodeResponse> {
    if let Err(problem) = request.validate(request_id.as_str()) {
        return Response::Error(*problem);
    }

    let address = request.address.trim().to_string();
    let geocoder = state.geocoder();
    let policy = state.planner().unresolved_policy;
    let lookup = address.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        try_resolve_address(&lookup, geocoder.as_ref(), &policy)
    })
    .await;

    let (coordinate, source) = match outcome {
        Ok(Ok(resolved)) => resolved,
        Ok(Err(error)) => {
            record_geocode_lookup("error");
            warn!(request_id = %request_id, %error, "geocoder unavailable");
            return Response::Error(from_lib_error(&error, request_id.as_str()));
        }
        Err(error) => {
            warn!(request_id = %request_id, %error, "geocoding task failed");
            return Response::Error(ProblemDetails::internal_error(
                "geocoding task failed",
                request_id.as_str(),
            ));
        }
    };

    record_geocode_lookup(source.as_str());

    match coordinate {
        Some(coordinate) => {
            info!(request_id = %request_id, %source, "address geocoded");
            Response::Success(ServiceResponse::new(GeocodeResponse {
                address,
                lat: coordinate.lat,
                lng: coordinate.lng,
                source,
            }))
        }
        None => Response::Error(ProblemDetails::address_not_found(&address, request_id.as_str())),
    }
}

/// Handle POST /api/driver requests.
async fn driver_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(request): Json<DriverRequest>,
) -> Response<DriverManifest> {
    if let Err(problem) = request.validate(request_id.as_str()) {
        return Response::Error(*problem);
    }

    let DriverRequest { mut orders, depot } = request;
    let Some(depot) = depot.as_deref().or(state.planner().depot()) else {
        return Response::Error(ProblemDetails::bad_request(
            "No 'depot' given and no depot address is configured",
            request_id.as_str(),
        ));
    };

    for order in &mut orders {
        apply_validation(order);
    }
    let manifest = driver_manifest(&orders, depot);
    match &manifest.link_error {
        Some(error) => {
            let reason = match error {
                InvalidRouteError::MissingEndpoints => "missing_endpoints",
                InvalidRouteError::WaypointLimitExceeded { .. } => "waypoint_limit",
            };
            record_link_rejected(reason, SERVICE);
        }
        None => record_link_generated(SERVICE),
    }

    info!(
        request_id = %request_id,
        pending = manifest.pending.len(),
        delivered = manifest.delivered,
        "driver manifest built"
    );

    Response::Success(ServiceResponse::new(manifest))
}
