pub mod auth;
pub mod index;

use axum::{extract::FromRef, response::IntoResponse, Json};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

use crate::{
    config::Config,
    libraries::page_template::PageTemplates,
    services::{
        fitness::{FitnessClientFactory, GoogleFitnessClientFactory},
        google_auth::GoogleAuth,
    },
};

pub use auth::{callback, login, logout};
pub use index::index;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fitness: Arc<dyn FitnessClientFactory>,
    pub auth: Arc<GoogleAuth>,
    pub templates: Arc<PageTemplates>,
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(
        config: Config,
        fitness: Arc<dyn FitnessClientFactory>,
        auth: GoogleAuth,
        templates: PageTemplates,
        cookie_key: Key,
    ) -> Self {
        Self {
            config: Arc::new(config),
            fitness,
            auth: Arc::new(auth),
            templates: Arc::new(templates),
            cookie_key,
        }
    }

    /// Wire up the Google-backed collaborators from configuration
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let fitness = GoogleFitnessClientFactory::new(&config.fitness_api_base_url)?;
        let auth = GoogleAuth::from_config(&config)?;
        let templates = PageTemplates::new()?;
        let cookie_key = config.cookie_key()?;

        Ok(Self::new(config, Arc::new(fitness), auth, templates, cookie_key))
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "fitness-map",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
