#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    response::IntoResponse,
};
use axum_extra::extract::cookie::{Key, PrivateCookieJar};
use httpmock::MockServer;
use std::sync::Arc;

use fitness_map::{
    config::Config,
    handlers::AppState,
    libraries::page_template::PageTemplates,
    services::{fitness::GoogleFitnessClientFactory, google_auth::GoogleAuth},
    session::{self, SessionData},
};

pub const MAPS_KEY: &str = "test-maps-key";

pub fn test_key() -> Key {
    Key::from(&[42u8; 64][..])
}

/// Config pointing every Google endpoint at the mock server
pub fn test_config(server: &MockServer) -> Config {
    Config {
        google_maps_api_key: MAPS_KEY.to_string(),
        google_client_id: "client-id".to_string(),
        google_client_secret: "client-secret".to_string(),
        google_auth_url: server.url("/o/oauth2/v2/auth"),
        google_token_url: server.url("/token"),
        fitness_api_base_url: server.url("/fitness/v1"),
        ..Default::default()
    }
}

pub fn test_state(server: &MockServer) -> AppState {
    let config = test_config(server);
    let fitness = GoogleFitnessClientFactory::new(&config.fitness_api_base_url).unwrap();
    let auth = GoogleAuth::from_config(&config).unwrap();
    let templates = PageTemplates::new().unwrap();
    AppState::new(config, Arc::new(fitness), auth, templates, test_key())
}

/// `name=value` pair of an encrypted session cookie, ready for a Cookie header
pub fn session_cookie(access_token: Option<&str>) -> String {
    let jar = session::sign_in(
        PrivateCookieJar::new(test_key()),
        &SessionData {
            access_token: access_token.map(str::to_string),
        },
    )
    .unwrap();
    let response = jar.into_response();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

/// Full Set-Cookie header for the named cookie, if the response sets it
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&prefix))
        .map(str::to_string)
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::HOST, "localhost:3000");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::HOST, "localhost:3000");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
