//! Nakimi route planning HTTP microservice.
//!
//! # Configuration
//!
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `NAKIMI_DEPOT_ADDRESS` - Depot used for driver round trips
//! - `NAKIMI_UNRESOLVED_POLICY` - `mark-invalid` (default) or `city-center`
//! - `NAKIMI_GEOCODER_URL` - Nominatim base URL
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text

use std::net::SocketAddr;

use tracing::{error, info};

use nakimi_service_shared::{
    AppState, LoggingConfig, MetricsConfig, ServiceConfig, init_logging, init_metrics,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("route");
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let config = ServiceConfig::from_env().map_err(|e| {
        error!(error = %e, "invalid service configuration");
        e
    })?;
    let port = config.port;

    info!(
        port,
        max_waypoints = config.planner.max_waypoints,
        policy = %config.planner.unresolved_policy,
        "starting route service"
    );

    // The geocoder owns a blocking HTTP client, which must not be built on a runtime thread.
    let state = tokio::task::spawn_blocking(move || AppState::from_config(config)).await??;

    let app = nakimi_service_route::app(state, &metrics_config.path);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
