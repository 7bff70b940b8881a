use axum_extra::extract::cookie::Key;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

/// Minimum decoded length of `SESSION_KEY`, dictated by the cookie encryption key size
pub const MIN_SESSION_KEY_BYTES: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SESSION_KEY is not valid base64: {0}")]
    InvalidSessionKey(#[from] base64::DecodeError),

    #[error("SESSION_KEY must decode to at least {MIN_SESSION_KEY_BYTES} bytes, got {0}")]
    SessionKeyTooShort(usize),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    // Browser key for the Maps JavaScript API, injected into the page
    pub google_maps_api_key: String,

    // OAuth client registered with Google
    pub google_client_id: String,
    pub google_client_secret: String,

    // Base64 cookie encryption key; a fresh one is generated per process when unset
    #[serde(default)]
    pub session_key: Option<String>,

    #[serde(default = "default_google_auth_url")]
    pub google_auth_url: String,

    #[serde(default = "default_google_token_url")]
    pub google_token_url: String,

    #[serde(default = "default_fitness_api_base_url")]
    pub fitness_api_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Config>()
    }

    /// Key used to encrypt and authenticate the session cookies
    pub fn cookie_key(&self) -> Result<Key, ConfigError> {
        match &self.session_key {
            Some(encoded) if !encoded.trim().is_empty() => {
                let bytes = STANDARD.decode(encoded.trim())?;
                if bytes.len() < MIN_SESSION_KEY_BYTES {
                    return Err(ConfigError::SessionKeyTooShort(bytes.len()));
                }
                Ok(Key::from(bytes.as_slice()))
            }
            _ => {
                tracing::warn!("SESSION_KEY not set, sessions will not survive a restart");
                Ok(Key::generate())
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            google_maps_api_key: String::new(),   // Must be provided via environment
            google_client_id: String::new(),      // Must be provided via environment
            google_client_secret: String::new(),  // Must be provided via environment
            session_key: None,
            google_auth_url: default_google_auth_url(),
            google_token_url: default_google_token_url(),
            fitness_api_base_url: default_fitness_api_base_url(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_google_auth_url() -> String {
    "https://accounts.google.com/o/oauth2/v2/auth".to_string()
}

fn default_google_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_fitness_api_base_url() -> String {
    "https://www.googleapis.com/fitness/v1".to_string()
}
