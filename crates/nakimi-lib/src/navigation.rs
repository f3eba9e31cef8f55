//! Multi-stop navigation links.
//!
//! Turns an origin, a destination, and an ordered list of intermediate
//! addresses into a Google Maps directions URL. The output must be
//! byte-for-byte stable: the same input always yields the same link, and every
//! component is escaped with URI-component rules (the `encodeURIComponent`
//! set), so spaces become `%20` and accented letters become their UTF-8
//! escapes.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::InvalidRouteError;

/// Directions endpoint of the navigation provider.
pub const GOOGLE_MAPS_DIR_URL: &str = "https://www.google.com/maps/dir/?api=1";

/// Most intermediate stops the provider accepts in one directions request
/// (origin + destination + 23 = 25 points).
pub const MAX_WAYPOINTS: usize = 23;

/// Characters left untouched by URI-component encoding.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Separator between waypoints; deliberately left unescaped.
const WAYPOINT_SEPARATOR: &str = "|";

/// Percent-encode a single URL component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Builds navigation links against a directions endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationLinkBuilder {
    base_url: String,
    max_waypoints: usize,
}

impl Default for NavigationLinkBuilder {
    fn default() -> Self {
        Self {
            base_url: GOOGLE_MAPS_DIR_URL.to_string(),
            max_waypoints: MAX_WAYPOINTS,
        }
    }
}

impl NavigationLinkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower the waypoint limit. Values above the provider limit are clamped.
    pub fn with_max_waypoints(mut self, max_waypoints: usize) -> Self {
        self.max_waypoints = max_waypoints.min(MAX_WAYPOINTS);
        self
    }

    /// Point the builder at a different directions endpoint (tests, mirrors).
    ///
    /// The base URL must already carry its query string; components are
    /// appended with `&`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn max_waypoints(&self) -> usize {
        self.max_waypoints
    }

    /// Build the link.
    ///
    /// # Errors
    ///
    /// - [`InvalidRouteError::MissingEndpoints`] when origin or destination is
    ///   blank. Checked first, whatever the waypoint count.
    /// - [`InvalidRouteError::WaypointLimitExceeded`] when there are more
    ///   waypoints than the limit.
    pub fn build<S: AsRef<str>>(
        &self,
        origin: &str,
        destination: &str,
        waypoints: &[S],
    ) -> Result<String, InvalidRouteError> {
        if origin.trim().is_empty() || destination.trim().is_empty() {
            return Err(InvalidRouteError::MissingEndpoints);
        }

        if waypoints.len() > self.max_waypoints {
            return Err(InvalidRouteError::WaypointLimitExceeded {
                max: self.max_waypoints,
                actual: waypoints.len(),
            });
        }

        let mut url = format!(
            "{}&origin={}&destination={}",
            self.base_url,
            encode_component(origin),
            encode_component(destination)
        );

        if !waypoints.is_empty() {
            let encoded: Vec<String> = waypoints
                .iter()
                .map(|waypoint| encode_component(waypoint.as_ref()))
                .collect();
            url.push_str("&waypoints=");
            url.push_str(&encoded.join(WAYPOINT_SEPARATOR));
        }

        Ok(url)
    }
}

/// Build a Google Maps directions link with the provider's defaults.
///
/// ```
/// use nakimi_lib::generate_url;
///
/// let url = generate_url("A", "B", &["C", "D"]).unwrap();
/// assert_eq!(
///     url,
///     "https://www.google.com/maps/dir/?api=1&origin=A&destination=B&waypoints=C|D"
/// );
/// ```
pub fn generate_url<S: AsRef<str>>(
    origin: &str,
    destination: &str,
    waypoints: &[S],
) -> Result<String, InvalidRouteError> {
    NavigationLinkBuilder::default().build(origin, destination, waypoints)
}
