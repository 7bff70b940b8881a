use chrono::{DateTime, Duration, Utc};
use std::error::Error;
use tracing::{error, info, warn};

use crate::{
    models::{Coordinate, DataPoint, DataSource, LocationFetchResult, NotFoundReason},
    services::fitness::{FitnessClient, CURRENT_USER},
};

/// Configuration for the location lookup
#[derive(Debug, Clone)]
pub struct LocationFetchConfig {
    pub source_marker: &'static str,  // Substring identifying a location stream
    pub window: Duration,             // How far back the dataset query reaches (7 days)
}

impl Default for LocationFetchConfig {
    fn default() -> Self {
        Self {
            source_marker: "location",
            window: Duration::days(7),
        }
    }
}

/// Finds the user's most recent location sample
pub struct LocationFetcher {
    config: LocationFetchConfig,
}

impl LocationFetcher {
    /// Create a new location fetcher with default config
    pub fn new() -> Self {
        Self {
            config: LocationFetchConfig::default(),
        }
    }

    /// Create a new location fetcher with custom config
    pub fn with_config(config: LocationFetchConfig) -> Self {
        Self { config }
    }

    /// List data sources, pick the location stream and read its last point.
    ///
    /// Remote failures are logged and folded into `TransportError`; nothing
    /// is propagated to the caller.
    pub async fn fetch_latest(
        &self,
        client: &dyn FitnessClient,
        now: DateTime<Utc>,
    ) -> LocationFetchResult {
        let sources = match client.list_data_sources(CURRENT_USER).await {
            Ok(sources) => sources,
            Err(e) => {
                let detail = error_chain(&e);
                error!("An error occurred while listing Fitness data sources: {}", detail);
                return LocationFetchResult::TransportError(detail);
            }
        };

        info!("Found {} data sources.", sources.len());
        for source in &sources {
            info!(
                "Data source: {} ({})",
                source.data_stream_name, source.data_stream_id
            );
        }

        let Some(source) = self.find_location_source(&sources) else {
            warn!("{}", NotFoundReason::NoLocationSource);
            return LocationFetchResult::NotFound(NotFoundReason::NoLocationSource);
        };
        info!("Found location data source: {}", source.data_stream_name);

        let end = now;
        let start = end - self.config.window;
        let dataset = dataset_id(start, end);
        info!("Querying dataset with ID: {}", dataset);

        let response = match client
            .get_dataset(CURRENT_USER, &source.data_stream_id, &dataset)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let detail = error_chain(&e);
                error!(
                    "An error occurred while fetching dataset {} of {}: {}",
                    dataset, source.data_stream_id, detail
                );
                return LocationFetchResult::TransportError(detail);
            }
        };

        // The API returns points oldest first
        let Some(point) = response.point.last() else {
            warn!("{}", NotFoundReason::NoPoints);
            return LocationFetchResult::NotFound(NotFoundReason::NoPoints);
        };
        info!("{} location points found.", response.point.len());

        match coordinate_from_point(point) {
            Some(coordinate) => {
                info!(
                    "User location set to: Lat={}, Lng={}",
                    coordinate.latitude, coordinate.longitude
                );
                LocationFetchResult::Found(coordinate)
            }
            None => {
                warn!("{}", NotFoundReason::InvalidPoint);
                LocationFetchResult::NotFound(NotFoundReason::InvalidPoint)
            }
        }
    }

    /// First data source whose name contains the marker (case sensitive)
    pub fn find_location_source<'a>(&self, sources: &'a [DataSource]) -> Option<&'a DataSource> {
        sources
            .iter()
            .find(|source| source.data_stream_name.contains(self.config.source_marker))
    }
}

impl Default for LocationFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Error message followed by every underlying cause
fn error_chain(e: &dyn Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(err) = source {
        message.push_str(&format!("\n  Caused by: {}", err));
        source = err.source();
    }
    message
}

/// Nanoseconds since the epoch, with sub-millisecond precision dropped
pub fn epoch_nanos(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_millis() * 1_000_000
}

/// Dataset identifier for the range `[start, end]`: `"{startNanos}-{endNanos}"`
pub fn dataset_id(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!("{}-{}", epoch_nanos(start), epoch_nanos(end))
}

/// Latitude and longitude from the first two values of a location sample
pub fn coordinate_from_point(point: &DataPoint) -> Option<Coordinate> {
    match point.value.as_slice() {
        [lat, lng, ..] => Some(Coordinate::new(lat.fp_val?, lng.fp_val?)),
        _ => None,
    }
}
