use serde::{Deserialize, Serialize};

/// Latitude/longitude pair taken from the most recent location sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Why no coordinate could be derived from the user's fitness data
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundReason {
    #[error("Session has no access token.")]
    MissingAccessToken,

    #[error("No location data source found.")]
    NoLocationSource,

    #[error("No location points found in the response for this data source.")]
    NoPoints,

    #[error("Last point has invalid data.")]
    InvalidPoint,
}

/// Outcome of one location lookup
#[derive(Debug, Clone, PartialEq)]
pub enum LocationFetchResult {
    Found(Coordinate),
    NotFound(NotFoundReason),
    TransportError(String),
}

impl LocationFetchResult {
    /// The coordinate to show on the map, if any
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            LocationFetchResult::Found(coordinate) => Some(*coordinate),
            _ => None,
        }
    }
}
