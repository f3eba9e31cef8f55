use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the Nakimi library.
pub type Result<T> = std::result::Result<T, Error>;

/// Raised when a navigation link cannot be built for the requested route.
///
/// Fatal only to the link-generation call that produced it; callers surface
/// the message to the operator and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRouteError {
    /// Origin or destination was empty.
    #[error("origin and destination are mandatory")]
    MissingEndpoints,

    /// More intermediate stops than the navigation provider accepts.
    #[error("waypoint limit exceeded: max {max}, got {actual}")]
    WaypointLimitExceeded { max: usize, actual: usize },
}

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Navigation link could not be generated.
    #[error(transparent)]
    InvalidRoute(#[from] InvalidRouteError),

    /// Raised when an order sheet lacks a column the planner cannot do without.
    #[error("order sheet is missing a required column: {column}")]
    MissingColumn { column: &'static str },

    /// Raised when a single order record holds a value that cannot be parsed.
    #[error("invalid order record on line {line}: {message}")]
    InvalidOrderRecord { line: u64, message: String },

    /// Raised when the order file extension is not recognised.
    #[error("unsupported order file {path}; expected .csv or .json")]
    UnsupportedOrderFile { path: PathBuf },

    /// Raised when the geocoding service answered with something unusable.
    #[error("geocoding failed for '{address}': {message}")]
    Geocoding { address: String, message: String },

    /// Raised when a planner configuration value is out of range.
    #[error("invalid planner configuration: {message}")]
    InvalidConfig { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
