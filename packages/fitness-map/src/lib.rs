use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod handlers;
pub mod libraries;
pub mod models;
pub mod services;
pub mod session;

use handlers::{callback, health, index, login, logout, AppState};
use services::google_auth::CALLBACK_PATH;

/// HTTP routes of the service
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(login))
        .route("/logout", post(logout))
        .route(CALLBACK_PATH, get(callback))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
