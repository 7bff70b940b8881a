use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use rand::{distributions::Alphanumeric, Rng};
use reqwest::Url;
use serde::Deserialize;

use crate::config::Config;

/// Read-only access to location samples in Google Fit
pub const FITNESS_LOCATION_READ_SCOPE: &str =
    "https://www.googleapis.com/auth/fitness.location.read";

/// Where Google sends the user back with the authorization code
pub const CALLBACK_PATH: &str = "/signin-google";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Sign-in was rejected by the identity provider: {0}")]
    ProviderDenied(String),

    #[error("Sign-in state did not match, please try again")]
    StateMismatch,

    #[error("Authorization code missing from callback")]
    MissingCode,

    #[error("Token exchange failed: {0}")]
    TokenExchange(#[from] reqwest::Error),

    #[error("Token endpoint returned HTTP {status}: {body}")]
    TokenEndpoint { status: reqwest::StatusCode, body: String },

    #[error("Invalid identity provider URL {0}")]
    InvalidUrl(String),

    #[error("Failed to write session: {0}")]
    Session(#[from] serde_json::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::ProviderDenied(_) => StatusCode::UNAUTHORIZED,
            AuthError::StateMismatch | AuthError::MissingCode => StatusCode::BAD_REQUEST,
            AuthError::TokenExchange(_) | AuthError::TokenEndpoint { .. } => StatusCode::BAD_GATEWAY,
            AuthError::InvalidUrl(_) | AuthError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

/// Tokens returned by the authorization code exchange
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
}

/// Google OAuth 2.0 authorization code flow
pub struct GoogleAuth {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    auth_url: Url,
    token_url: Url,
}

impl GoogleAuth {
    pub fn from_config(config: &Config) -> Result<Self, AuthError> {
        let parse = |url: &str| {
            Url::parse(url).map_err(|e| AuthError::InvalidUrl(format!("{}: {}", url, e)))
        };

        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            auth_url: parse(&config.google_auth_url)?,
            token_url: parse(&config.google_token_url)?,
        })
    }

    /// URL of the provider's consent screen
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> Url {
        let scope = format!("openid email profile {}", FITNESS_LOCATION_READ_SCOPE);

        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &scope)
            .append_pair("state", state);
        url
    }

    /// Trade an authorization code for tokens
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<TokenResponse, AuthError> {
        tracing::debug!("Exchanging authorization code at {}", self.token_url);

        let response = self
            .http
            .post(self.token_url.clone())
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Token endpoint returned HTTP {}", status);
            return Err(AuthError::TokenEndpoint { status, body });
        }

        Ok(response.json().await?)
    }
}

/// Random value tying a callback to the browser that started the sign-in
pub fn generate_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Absolute callback URL as seen by the browser.
///
/// Only the scheme is taken from the proxy (`X-Forwarded-Proto`); the host
/// always comes from `Host`, so a client cannot redirect the code elsewhere.
pub fn callback_url(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| v == "http" || v == "https")
        .unwrap_or_else(|| "http".to_string());
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| "localhost".to_string());

    format!("{}://{}{}", scheme, host, CALLBACK_PATH)
}
