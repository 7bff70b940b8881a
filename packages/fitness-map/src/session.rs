//! Cookie-backed sign-in state.
//!
//! The whole session lives in an encrypted cookie, so nothing is kept in
//! process memory between requests.

use std::fmt;

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE: &str = "fitness_map_session";
pub const OAUTH_STATE_COOKIE: &str = "fitness_map_oauth_state";

/// Opaque bearer credential issued by the identity provider
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Payload of the session cookie
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Read side of the session, as seen by the page handler
pub trait SessionTokenSource: Send + Sync {
    fn is_authenticated(&self) -> bool;

    fn current_access_token(&self) -> Option<AccessToken>;
}

/// Session decoded from the request's private cookie jar
#[derive(Debug, Clone, Default)]
pub struct CookieSession {
    data: Option<SessionData>,
}

impl CookieSession {
    pub fn from_jar(jar: &PrivateCookieJar) -> Self {
        let data = jar.get(SESSION_COOKIE).and_then(|cookie| {
            match serde_json::from_str::<SessionData>(cookie.value()) {
                Ok(data) => Some(data),
                Err(e) => {
                    tracing::warn!("Ignoring unreadable session cookie: {}", e);
                    None
                }
            }
        });

        Self { data }
    }
}

impl SessionTokenSource for CookieSession {
    fn is_authenticated(&self) -> bool {
        self.data.is_some()
    }

    fn current_access_token(&self) -> Option<AccessToken> {
        self.data
            .as_ref()
            .and_then(|data| data.access_token.as_deref())
            .filter(|token| !token.is_empty())
            .map(AccessToken::new)
    }
}

fn base_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Establish the session, saving the provider's tokens into it
pub fn sign_in(jar: PrivateCookieJar, data: &SessionData) -> Result<PrivateCookieJar, serde_json::Error> {
    let value = serde_json::to_string(data)?;
    Ok(jar.add(base_cookie(SESSION_COOKIE, value)))
}

/// Drop the session and any half-finished sign-in
pub fn sign_out(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
        .remove(Cookie::build(OAUTH_STATE_COOKIE).path("/"))
}

pub fn remember_oauth_state(jar: PrivateCookieJar, state: String) -> PrivateCookieJar {
    jar.add(base_cookie(OAUTH_STATE_COOKIE, state))
}

/// Take the pending OAuth state out of the jar
pub fn take_oauth_state(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<String>) {
    let state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(Cookie::build(OAUTH_STATE_COOKIE).path("/"));
    (jar, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Key;

    fn jar_with_session(data: &SessionData) -> PrivateCookieJar {
        sign_in(PrivateCookieJar::new(Key::generate()), data).unwrap()
    }

    #[test]
    fn test_no_cookie_is_anonymous() {
        let session = CookieSession::from_jar(&PrivateCookieJar::new(Key::generate()));
        assert!(!session.is_authenticated());
        assert!(session.current_access_token().is_none());
    }

    #[test]
    fn test_signed_in_session_exposes_token() {
        let jar = jar_with_session(&SessionData {
            access_token: Some("ya29.token".to_string()),
        });
        let session = CookieSession::from_jar(&jar);

        assert!(session.is_authenticated());
        assert_eq!(session.current_access_token(), Some(AccessToken::new("ya29.token")));
    }

    #[test]
    fn test_authenticated_without_token() {
        for data in [
            SessionData { access_token: None },
            SessionData { access_token: Some(String::new()) },
        ] {
            let session = CookieSession::from_jar(&jar_with_session(&data));
            assert!(session.is_authenticated());
            assert!(session.current_access_token().is_none());
        }
    }

    #[test]
    fn test_corrupt_payload_is_anonymous() {
        let jar = PrivateCookieJar::new(Key::generate())
            .add(Cookie::new(SESSION_COOKIE, "{not json"));
        assert!(!CookieSession::from_jar(&jar).is_authenticated());
    }

    #[test]
    fn test_sign_out_clears_session() {
        let jar = jar_with_session(&SessionData {
            access_token: Some("ya29.token".to_string()),
        });
        let jar = sign_out(jar);
        assert!(!CookieSession::from_jar(&jar).is_authenticated());
    }

    #[test]
    fn test_take_oauth_state() {
        let jar = remember_oauth_state(PrivateCookieJar::new(Key::generate()), "abc".to_string());
        let (jar, state) = take_oauth_state(jar);
        assert_eq!(state.as_deref(), Some("abc"));
        assert!(jar.get(OAUTH_STATE_COOKIE).is_none());
    }

    #[test]
    fn test_access_token_debug_is_redacted() {
        let token = AccessToken::new("ya29.secret");
        assert!(!format!("{:?}", token).contains("secret"));
    }
}
