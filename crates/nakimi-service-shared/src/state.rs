//! Application state for the HTTP services.
//!
//! Handlers reach the planner configuration and the geocoder through the
//! shared [`AppState`].

use std::sync::Arc;

use thiserror::Error;

use nakimi_lib::{
    Coordinate, Error as LibError, Geocoder, NavigationLinkBuilder, NominatimGeocoder,
    PlannerConfig, UnresolvedPolicy, MAX_WAYPOINTS,
};

/// Error during application state initialization.
#[derive(Debug, Error)]
pub enum AppStateError {
    /// An environment variable holds a value that cannot be used.
    #[error("invalid value for {name}: {message}")]
    InvalidSetting { name: &'static str, message: String },

    /// The resulting planner configuration failed its own checks.
    #[error("invalid planner configuration: {0}")]
    Config(#[source] LibError),

    /// The geocoding client could not be created.
    #[error("failed to create geocoder: {0}")]
    Geocoder(#[source] LibError),
}

/// Service settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub port: u16,
    pub planner: PlannerConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            planner: PlannerConfig::default(),
        }
    }
}

fn parse_setting<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, AppStateError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| AppStateError::InvalidSetting {
            name,
            message: e.to_string(),
        })
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// - `SERVICE_PORT` (default 8080)
    /// - `NAKIMI_DEPOT_ADDRESS`
    /// - `NAKIMI_UNRESOLVED_POLICY`: `mark-invalid` (default) or `city-center`
    /// - `NAKIMI_FALLBACK_LAT`, `NAKIMI_FALLBACK_LNG`: city-center position
    /// - `NAKIMI_GEOCODER_URL`
    /// - `NAKIMI_MAX_WAYPOINTS`: clamped to the provider maximum
    pub fn from_env() -> Result<Self, AppStateError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppStateError> {
        let mut config = Self::default();

        if let Some(port) = lookup("SERVICE_PORT") {
            config.port = parse_setting("SERVICE_PORT", &port)?;
        }

        config.planner.depot = lookup("NAKIMI_DEPOT_ADDRESS").filter(|d| !d.trim().is_empty());

        if let Some(policy) = lookup("NAKIMI_UNRESOLVED_POLICY") {
            config.planner.unresolved_policy = parse_setting("NAKIMI_UNRESOLVED_POLICY", &policy)?;
        }

        if let UnresolvedPolicy::CityCenter { center } = &mut config.planner.unresolved_policy {
            let lat = lookup("NAKIMI_FALLBACK_LAT");
            let lng = lookup("NAKIMI_FALLBACK_LNG");
            match (lat, lng) {
                (Some(lat), Some(lng)) => {
                    *center = Coordinate::new(
                        parse_setting("NAKIMI_FALLBACK_LAT", &lat)?,
                        parse_setting("NAKIMI_FALLBACK_LNG", &lng)?,
                    );
                }
                (None, None) => {}
                _ => {
                    return Err(AppStateError::InvalidSetting {
                        name: "NAKIMI_FALLBACK_LAT",
                        message: "set both NAKIMI_FALLBACK_LAT and NAKIMI_FALLBACK_LNG".to_string(),
                    })
                }
            }
        }

        if let Some(url) = lookup("NAKIMI_GEOCODER_URL").filter(|u| !u.trim().is_empty()) {
            config.planner.geocoder_url = url;
        }

        if let Some(max) = lookup("NAKIMI_MAX_WAYPOINTS") {
            let requested: usize = parse_setting("NAKIMI_MAX_WAYPOINTS", &max)?;
            if requested > MAX_WAYPOINTS {
                tracing::warn!(
                    requested,
                    max = MAX_WAYPOINTS,
                    "clamping NAKIMI_MAX_WAYPOINTS"
                );
            }
            config.planner.max_waypoints = requested.min(MAX_WAYPOINTS);
        }

        config.planner.validate().map_err(AppStateError::Config)?;
        Ok(config)
    }
}

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally) and should be
/// shared via axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::post, extract::State};
/// use nakimi_service_shared::{AppState, ServiceConfig};
///
/// async fn handler(State(state): State<AppState>) {
///     let builder = state.link_builder();
///     // ... build a link
/// }
///
/// let state = AppState::from_config(ServiceConfig::from_env()?)?;
/// let app = Router::new()
///     .route("/api/link", post(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServiceConfig,
    geocoder: Arc<dyn Geocoder>,
}

impl AppState {
    /// Build state with a Nominatim geocoder at the configured URL.
    ///
    /// Creates a blocking HTTP client; call it outside the async runtime or
    /// from `spawn_blocking`.
    pub fn from_config(config: ServiceConfig) -> Result<Self, AppStateError> {
        let geocoder = NominatimGeocoder::new(config.planner.geocoder_url.clone())
            .map_err(AppStateError::Geocoder)?;
        tracing::info!(url = geocoder.base_url(), "geocoder configured");
        Ok(Self::from_components(config, Arc::new(geocoder)))
    }

    /// Create application state from pre-built components.
    ///
    /// This is useful for testing with an offline geocoder.
    pub fn from_components(config: ServiceConfig, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, geocoder }),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    pub fn planner(&self) -> &PlannerConfig {
        &self.inner.config.planner
    }

    /// Shared handle to the geocoder, for moving into blocking tasks.
    pub fn geocoder(&self) -> Arc<dyn Geocoder> {
        Arc::clone(&self.inner.geocoder)
    }

    pub fn link_builder(&self) -> NavigationLinkBuilder {
        self.inner.config.planner.link_builder()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let planner = &self.inner.config.planner;
        f.debug_struct("AppState")
            .field("port", &self.inner.config.port)
            .field("max_waypoints", &planner.max_waypoints)
            .field("unresolved_policy", &planner.unresolved_policy.to_string())
            .field("depot_configured", &planner.depot().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nakimi_lib::{StaticGeocoder, SANTIAGO_CENTER};
    use std::collections::HashMap;

    fn lookup(vars: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| vars.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = ServiceConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(
            config.planner.unresolved_policy,
            UnresolvedPolicy::MarkInvalid
        );
    }

    #[test]
    fn test_reads_service_settings() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("SERVICE_PORT", "9090"),
            ("NAKIMI_DEPOT_ADDRESS", "Centro Logístico"),
            ("NAKIMI_MAX_WAYPOINTS", "10"),
            ("NAKIMI_GEOCODER_URL", "http://localhost:8088"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.planner.depot(), Some("Centro Logístico"));
        assert_eq!(config.planner.max_waypoints, 10);
        assert_eq!(config.planner.geocoder_url, "http://localhost:8088");
    }

    #[test]
    fn test_max_waypoints_is_clamped() {
        let config = ServiceConfig::from_lookup(lookup(&[("NAKIMI_MAX_WAYPOINTS", "40")])).unwrap();
        assert_eq!(config.planner.max_waypoints, MAX_WAYPOINTS);
    }

    #[test]
    fn test_city_center_policy_with_fallback() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("NAKIMI_UNRESOLVED_POLICY", "city-center"),
            ("NAKIMI_FALLBACK_LAT", "-33.0472"),
            ("NAKIMI_FALLBACK_LNG", "-71.6127"),
        ]))
        .unwrap();
        assert_eq!(
            config.planner.unresolved_policy,
            UnresolvedPolicy::CityCenter {
                center: Coordinate::new(-33.0472, -71.6127)
            }
        );
    }

    #[test]
    fn test_city_center_defaults_to_santiago() {
        let config = ServiceConfig::from_lookup(lookup(&[(
            "NAKIMI_UNRESOLVED_POLICY",
            "city-center",
        )]))
        .unwrap();
        assert_eq!(
            config.planner.unresolved_policy,
            UnresolvedPolicy::CityCenter {
                center: SANTIAGO_CENTER
            }
        );
    }

    #[test]
    fn test_invalid_settings_are_named() {
        let err = ServiceConfig::from_lookup(lookup(&[("SERVICE_PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("SERVICE_PORT"));

        let err = ServiceConfig::from_lookup(lookup(&[("NAKIMI_UNRESOLVED_POLICY", "jitter")]))
            .unwrap_err();
        assert!(err.to_string().contains("jitter"));

        let err = ServiceConfig::from_lookup(lookup(&[
            ("NAKIMI_UNRESOLVED_POLICY", "city-center"),
            ("NAKIMI_FALLBACK_LAT", "-33.0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("NAKIMI_FALLBACK_LNG"));
    }

    #[test]
    fn test_app_state_debug() {
        let state =
            AppState::from_components(ServiceConfig::default(), Arc::new(StaticGeocoder::new()));
        let debug = format!("{:?}", state);

        assert!(debug.contains("AppState"));
        assert!(debug.contains("mark-invalid"));
        assert!(debug.contains("depot_configured"));
    }

    #[test]
    fn test_app_state_clone_shares_config() {
        let state1 =
            AppState::from_components(ServiceConfig::default(), Arc::new(StaticGeocoder::new()));
        let state2 = state1.clone();
        assert_eq!(state1.config(), state2.config());
        assert_eq!(state2.link_builder().max_waypoints(), MAX_WAYPOINTS);
    }
}
