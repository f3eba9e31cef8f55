//! Address geocoding and the policy for addresses that cannot be resolved.
//!
//! Geocoding is a collaborator of the planner, not part of it: sequencing only
//! ever sees coordinates that were attached here (or came with the order
//! sheet). What happens when an address cannot be resolved is a configurable
//! [`UnresolvedPolicy`].

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::order::{Coordinate, Order};
use crate::validation::ValidationError;

/// Santiago city centre, the default fallback position.
pub const SANTIAGO_CENTER: Coordinate = Coordinate::new(-33.45, -70.6667);

/// Public OpenStreetMap Nominatim instance.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

const USER_AGENT: &str = concat!("nakimi-route-planner/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

fn default_center() -> Coordinate {
    SANTIAGO_CENTER
}

/// What to do with a valid order whose address could not be geocoded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum UnresolvedPolicy {
    /// Flag the order invalid so it never reaches a route.
    #[default]
    MarkInvalid,
    /// Place the order at a fixed fallback position and keep it routable.
    CityCenter {
        #[serde(default = "default_center")]
        center: Coordinate,
    },
}

impl fmt::Display for UnresolvedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedPolicy::MarkInvalid => f.write_str("mark-invalid"),
            UnresolvedPolicy::CityCenter { .. } => f.write_str("city-center"),
        }
    }
}

impl FromStr for UnresolvedPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mark-invalid" | "invalid" => Ok(UnresolvedPolicy::MarkInvalid),
            "city-center" | "fallback" => Ok(UnresolvedPolicy::CityCenter {
                center: SANTIAGO_CENTER,
            }),
            other => Err(format!("unknown unresolved policy '{other}'")),
        }
    }
}

/// Where an order's coordinates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionSource {
    /// Already present on the order (sheet `lat`/`lng`).
    Source,
    /// Returned by the geocoder.
    Geocoder,
    /// Fallback position from [`UnresolvedPolicy::CityCenter`].
    Fallback,
    /// Nothing found; the order was marked invalid.
    Unresolved,
    /// Invalid order, not looked up.
    Skipped,
}

impl ResolutionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionSource::Source => "source",
            ResolutionSource::Geocoder => "geocoder",
            ResolutionSource::Fallback => "fallback",
            ResolutionSource::Unresolved => "unresolved",
            ResolutionSource::Skipped => "skipped",
        }
    }
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a free-text address to a position.
pub trait Geocoder: Send + Sync {
    /// Look up `address`. `Ok(None)` means the service knows no such place.
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>>;
}

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

/// Parse a Nominatim `format=json` search response; the first hit wins.
pub fn parse_nominatim_response(address: &str, body: &str) -> Result<Option<Coordinate>> {
    let hits: Vec<NominatimHit> = serde_json::from_str(body)?;
    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    let parse = |value: &str| {
        value.trim().parse::<f64>().map_err(|e| Error::Geocoding {
            address: address.to_string(),
            message: format!("invalid coordinate '{value}': {e}"),
        })
    };

    Ok(Some(Coordinate::new(parse(&hit.lat)?, parse(&hit.lon)?)))
}

/// Geocoder backed by an OpenStreetMap Nominatim-compatible search API.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Create a geocoder for `base_url` (without the `/search` suffix).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>> {
        let url = format!("{}/search", self.base_url);
        tracing::debug!(%url, address, "geocoding address");
        let body = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("limit", "1"), ("q", address)])
            .send()?
            .error_for_status()?
            .text()?;
        parse_nominatim_response(address, &body)
    }
}

/// In-memory geocoder keyed by address (case and surrounding blanks ignored).
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    entries: HashMap<String, Coordinate>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(address: &str) -> String {
        address.trim().to_lowercase()
    }

    pub fn insert(&mut self, address: &str, coordinate: Coordinate) {
        self.entries.insert(Self::key(address), coordinate);
    }

    pub fn with(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.insert(address, coordinate);
        self
    }

    /// Load a JSON object mapping addresses to `{"lat":…,"lng":…}`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let table: HashMap<String, Coordinate> = serde_json::from_str(&raw)?;
        let mut geocoder = Self::new();
        for (address, coordinate) in table {
            geocoder.insert(&address, coordinate);
        }
        Ok(geocoder)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>> {
        Ok(self.entries.get(&Self::key(address)).copied())
    }
}

/// Resolve a single address, applying `policy` when the geocoder has nothing.
///
/// Geocoder failures are returned to the caller untouched.
pub fn try_resolve_address(
    address: &str,
    geocoder: &dyn Geocoder,
    policy: &UnresolvedPolicy,
) -> Result<(Option<Coordinate>, ResolutionSource)> {
    if let Some(coordinate) = geocoder.geocode(address)?.filter(Coordinate::is_resolved) {
        return Ok((Some(coordinate), ResolutionSource::Geocoder));
    }
    tracing::warn!(address, "geocoder returned no position");
    Ok(apply_policy(policy))
}

/// Like [`try_resolve_address`], but geocoder failures are logged and
/// treated like "not found".
pub fn resolve_address(
    address: &str,
    geocoder: &dyn Geocoder,
    policy: &UnresolvedPolicy,
) -> (Option<Coordinate>, ResolutionSource) {
    try_resolve_address(address, geocoder, policy).unwrap_or_else(|error| {
        tracing::warn!(address, %error, "geocoding failed");
        apply_policy(policy)
    })
}

fn apply_policy(policy: &UnresolvedPolicy) -> (Option<Coordinate>, ResolutionSource) {
    match policy {
        UnresolvedPolicy::MarkInvalid => (None, ResolutionSource::Unresolved),
        UnresolvedPolicy::CityCenter { center } => (Some(*center), ResolutionSource::Fallback),
    }
}

/// Attach coordinates to one validated order.
pub fn resolve_order(
    order: &mut Order,
    geocoder: &dyn Geocoder,
    policy: &UnresolvedPolicy,
) -> ResolutionSource {
    if !order.is_valid {
        return ResolutionSource::Skipped;
    }
    if order.has_resolved_coordinates() {
        return ResolutionSource::Source;
    }

    let address = order
        .address
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_string();
    let (coordinate, source) = resolve_address(&address, geocoder, policy);
    match coordinate {
        Some(coordinate) => order.coordinates = Some(coordinate),
        None => {
            order.coordinates = None;
            order.is_valid = false;
            order
                .validation_errors
                .push(ValidationError::UnresolvedCoordinates);
        }
    }
    source
}

/// Attach coordinates to every valid order, in place.
///
/// Returns one [`ResolutionSource`] per order, aligned with the input.
pub fn resolve_orders(
    orders: &mut [Order],
    geocoder: &dyn Geocoder,
    policy: &UnresolvedPolicy,
) -> Vec<ResolutionSource> {
    let sources: Vec<ResolutionSource> = orders
        .iter_mut()
        .map(|order| resolve_order(order, geocoder, policy))
        .collect();

    let count = |wanted: ResolutionSource| sources.iter().filter(|s| **s == wanted).count();
    tracing::info!(
        orders = orders.len(),
        geocoded = count(ResolutionSource::Geocoder),
        fallback = count(ResolutionSource::Fallback),
        unresolved = count(ResolutionSource::Unresolved),
        policy = %policy,
        "order coordinates resolved"
    );
    sources
}
