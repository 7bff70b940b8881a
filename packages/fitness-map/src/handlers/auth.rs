use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    handlers::AppState,
    services::google_auth::{callback_url, generate_state, AuthError},
    session::{self, SessionData},
};

/// Start the Google sign-in challenge
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Redirect) {
    let oauth_state = generate_state();
    let redirect_uri = callback_url(&headers);
    let url = state.auth.authorization_url(&redirect_uri, &oauth_state);

    info!("Redirecting to Google sign-in, callback {}", redirect_uri);

    let jar = session::remember_oauth_state(jar, oauth_state);
    (jar, Redirect::to(url.as_str()))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Finish the sign-in: check state, exchange the code and save the tokens in the session.
///
/// The pending state cookie is consumed on every outcome, so the jar goes
/// back to the browser with errors too.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: PrivateCookieJar,
    Query(params): Query<CallbackParams>,
) -> Response {
    let (jar, expected_state) = session::take_oauth_state(jar);

    match complete_sign_in(&state, &headers, jar.clone(), expected_state, params).await {
        Ok(jar) => (jar, Redirect::to("/")).into_response(),
        Err(err) => (jar, err).into_response(),
    }
}

async fn complete_sign_in(
    state: &AppState,
    headers: &HeaderMap,
    jar: PrivateCookieJar,
    expected_state: Option<String>,
    params: CallbackParams,
) -> Result<PrivateCookieJar, AuthError> {
    if let Some(error) = params.error {
        warn!("Google sign-in failed: {}", error);
        return Err(AuthError::ProviderDenied(error));
    }

    match (expected_state.as_deref(), params.state.as_deref()) {
        (Some(expected), Some(received)) if expected == received => {}
        _ => {
            warn!("OAuth state mismatch on callback");
            return Err(AuthError::StateMismatch);
        }
    }

    let code = params.code.ok_or(AuthError::MissingCode)?;
    let tokens = state
        .auth
        .exchange_code(&code, &callback_url(headers))
        .await?;

    info!("User signed in with Google");

    Ok(session::sign_in(
        jar,
        &SessionData {
            access_token: Some(tokens.access_token),
        },
    )?)
}

/// Clear the session and go back to the map
pub async fn logout(jar: PrivateCookieJar) -> (PrivateCookieJar, Redirect) {
    info!("User signed out");
    (session::sign_out(jar), Redirect::to("/"))
}
