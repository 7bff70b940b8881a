use serde::Serialize;

use super::Coordinate;

/// View model of the map page
#[derive(Debug, Clone, Serialize)]
pub struct IndexPage {
    pub api_key: String,
    pub is_authenticated: bool,
    pub user_location: Option<Coordinate>,
}

impl IndexPage {
    pub fn new(api_key: String, is_authenticated: bool) -> Self {
        Self {
            api_key,
            is_authenticated,
            user_location: None,
        }
    }
}
