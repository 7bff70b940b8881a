use handlebars::Handlebars;
use reqwest::Url;
use serde::Serialize;

use crate::models::{Coordinate, IndexPage};

pub const INDEX_TEMPLATE: &str = "index";

const MAPS_SCRIPT_URL: &str = "https://maps.googleapis.com/maps/api/js";
const MAPS_CALLBACK: &str = "initMap";

/// Map shown when there is no location: whole world
const DEFAULT_CENTER: Coordinate = Coordinate {
    latitude: 0.0,
    longitude: 0.0,
};
const DEFAULT_ZOOM: u8 = 2;
const LOCATION_ZOOM: u8 = 15;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Failed to compile page template: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Failed to render page: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("Invalid Maps script URL: {0}")]
    ScriptUrl(String),
}

/// Everything the index template reads
#[derive(Serialize)]
struct IndexView<'a> {
    page: &'a IndexPage,
    center: Coordinate,
    zoom: u8,
    status: String,
    user_location_json: String,
    maps_script_url: String,
}

/// Compiled page templates, built once at startup and shared through the app state
pub struct PageTemplates {
    registry: Handlebars<'static>,
    maps_script: Url,
}

impl PageTemplates {
    pub fn new() -> Result<Self, PageError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string(INDEX_TEMPLATE, include_str!("../../templates/index.hbs"))?;

        let maps_script = Url::parse(MAPS_SCRIPT_URL)
            .map_err(|e| PageError::ScriptUrl(format!("{}: {}", MAPS_SCRIPT_URL, e)))?;

        Ok(Self {
            registry,
            maps_script,
        })
    }

    /// Google Maps loader with the API key and callback as encoded query parameters
    pub fn maps_script_url(&self, api_key: &str) -> Url {
        let mut url = self.maps_script.clone();
        url.query_pairs_mut()
            .append_pair("key", api_key)
            .append_pair("callback", MAPS_CALLBACK);
        url
    }

    /// Render the single map page
    pub fn render_index(&self, page: &IndexPage) -> Result<String, PageError> {
        let (center, zoom) = match page.user_location {
            Some(location) => (location, LOCATION_ZOOM),
            None => (DEFAULT_CENTER, DEFAULT_ZOOM),
        };

        let status = match (&page.user_location, page.is_authenticated) {
            (Some(location), _) => format!(
                "Last known location: {:.5}, {:.5}",
                location.latitude, location.longitude
            ),
            (None, true) => "No recent location found in Google Fit.".to_string(),
            (None, false) => "Sign in to show your last Google Fit location.".to_string(),
        };

        // Emitted unescaped inside <script>; serde_json never produces `<` for numbers
        let user_location_json =
            serde_json::to_string(&page.user_location).unwrap_or_else(|_| "null".to_string());

        let view = IndexView {
            page,
            center,
            zoom,
            status,
            user_location_json,
            maps_script_url: self.maps_script_url(&page.api_key).to_string(),
        };

        Ok(self.registry.render(INDEX_TEMPLATE, &view)?)
    }
}
