pub mod fitness;
pub mod location;
pub mod page;

// Re-export commonly used types
pub use fitness::{DataPoint, DataSource, Dataset, ListDataSourcesResponse, Value};
pub use location::{Coordinate, LocationFetchResult, NotFoundReason};
pub use page::IndexPage;
