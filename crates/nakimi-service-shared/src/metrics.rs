//! Prometheus metrics for the Nakimi services.
//!
//! This module provides:
//! - [`MetricsConfig`]: Configuration for the metrics system
//! - [`init_metrics`]: Initialize the Prometheus metrics recorder
//! - [`metrics_handler`]: Axum handler for `/metrics` endpoint
//! - Business metric helpers for sequencing, links and geocoding
//!
//! # Example
//!
//! ```no_run
//! use nakimi_service_shared::metrics::{MetricsConfig, init_metrics, metrics_handler};
//! use axum::{Router, routing::get};
//!
//! let config = MetricsConfig::default();
//! init_metrics(&config).expect("failed to initialize metrics");
//!
//! let app: Router = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled.
    pub enabled: bool,
    /// Path for the metrics endpoint (e.g., "/metrics").
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create configuration from environment variables.
    ///
    /// - `METRICS_ENABLED`: "true" or "false" (default: true)
    /// - `METRICS_PATH`: Path for metrics endpoint (default: "/metrics")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = lookup("METRICS_ENABLED")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        let path = lookup("METRICS_PATH")
            .filter(|p| p.starts_with('/'))
            .unwrap_or_else(|| "/metrics".to_string());

        Self { enabled, path }
    }
}

/// Initialize the Prometheus metrics recorder.
///
/// Must be called once at startup before any metrics are recorded.
///
/// # Errors
///
/// Returns an error if metrics are disabled, if a recorder is already
/// installed, or if the Prometheus builder fails.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    Ok(())
}

/// Axum handler for the `/metrics` endpoint.
///
/// Returns Prometheus exposition format text.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone, Error)]
pub enum MetricsError {
    /// Metrics are disabled in configuration.
    #[error("metrics are disabled")]
    Disabled,
    /// The recorder has already been installed.
    #[error("metrics recorder already initialized")]
    AlreadyInitialized,
    /// The Prometheus builder failed to install.
    #[error("failed to install metrics recorder: {0}")]
    InstallFailed(String),
}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// Record a sequenced route.
///
/// Increments `nakimi_routes_sequenced_total`, labelled by strategy.
pub fn record_route_sequenced(strategy: &str, service: &str) {
    metrics::counter!(
        "nakimi_routes_sequenced_total",
        "strategy" => strategy.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}

/// Record how many stops a sequenced route visits.
///
/// Records to the `nakimi_route_stops` histogram.
pub fn record_route_stops(stops: usize, strategy: &str) {
    metrics::histogram!(
        "nakimi_route_stops",
        "strategy" => strategy.to_string()
    )
    .record(stops as f64);
}

/// Record a navigation link handed out.
///
/// Increments `nakimi_links_generated_total`.
pub fn record_link_generated(service: &str) {
    metrics::counter!(
        "nakimi_links_generated_total",
        "service" => service.to_string()
    )
    .increment(1);
}

/// Record a navigation link that could not be built.
///
/// Increments `nakimi_links_rejected_total`; `reason` is
/// `missing_endpoints`, `waypoint_limit` or `validation_error`.
pub fn record_link_rejected(reason: &str, service: &str) {
    metrics::counter!(
        "nakimi_links_rejected_total",
        "reason" => reason.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}

/// Record a geocoding lookup and where its answer came from.
///
/// Increments `nakimi_geocode_lookups_total`.
pub fn record_geocode_lookup(source: &str) {
    metrics::counter!(
        "nakimi_geocode_lookups_total",
        "source" => source.to_string()
    )
    .increment(1);
}
