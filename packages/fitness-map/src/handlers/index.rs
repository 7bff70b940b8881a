use axum::{extract::State, http::StatusCode, response::Html};
use axum_extra::extract::cookie::PrivateCookieJar;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::{
    config::Config,
    handlers::AppState,
    libraries::location_fetch::LocationFetcher,
    models::{IndexPage, LocationFetchResult, NotFoundReason},
    services::fitness::FitnessClientFactory,
    session::{CookieSession, SessionTokenSource},
};

/// Render the map page, centered on the user's last Google Fit location when one is known
pub async fn index(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<Html<String>, StatusCode> {
    let session = CookieSession::from_jar(&jar);
    let page = build_index_page(&state.config, &session, state.fitness.as_ref(), Utc::now()).await;

    state.templates.render_index(&page).map(Html).map_err(|e| {
        error!("Failed to render map page: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Assemble the page model. Never fails: any lookup problem just leaves the location empty.
pub async fn build_index_page(
    config: &Config,
    session: &dyn SessionTokenSource,
    fitness: &dyn FitnessClientFactory,
    now: DateTime<Utc>,
) -> IndexPage {
    let mut page = IndexPage::new(config.google_maps_api_key.clone(), session.is_authenticated());

    if !page.is_authenticated {
        return page;
    }

    info!("User is authenticated. Fetching location data.");
    let result = match session.current_access_token() {
        Some(token) => {
            let client = fitness.build(token);
            LocationFetcher::new().fetch_latest(client.as_ref(), now).await
        }
        None => {
            warn!("{}", NotFoundReason::MissingAccessToken);
            LocationFetchResult::NotFound(NotFoundReason::MissingAccessToken)
        }
    };

    page.user_location = result.coordinate();
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Coordinate, DataPoint, DataSource, Dataset, Value},
        services::fitness::{FitnessClient, FitnessError},
        session::AccessToken,
    };
    use async_trait::async_trait;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    struct FakeSession {
        authenticated: bool,
        token: Option<&'static str>,
    }

    impl SessionTokenSource for FakeSession {
        fn is_authenticated(&self) -> bool {
            self.authenticated
        }

        fn current_access_token(&self) -> Option<AccessToken> {
            self.token.map(AccessToken::new)
        }
    }

    struct CannedClient {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl FitnessClient for CannedClient {
        async fn list_data_sources(&self, _user_id: &str) -> Result<Vec<DataSource>, FitnessError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![DataSource::new("derived:location", "merge_location_samples")])
        }

        async fn get_dataset(
            &self,
            _user_id: &str,
            _data_source_id: &str,
            _dataset_id: &str,
        ) -> Result<Dataset, FitnessError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Dataset {
                point: vec![DataPoint::with_values(vec![
                    Value::fp(37.7749),
                    Value::fp(-122.4194),
                ])],
                ..Default::default()
            })
        }
    }

    #[derive(Default)]
    struct RecordingFactory {
        tokens: Mutex<Vec<AccessToken>>,
        calls: Arc<AtomicUsize>,
    }

    impl FitnessClientFactory for RecordingFactory {
        fn build(&self, token: AccessToken) -> Box<dyn FitnessClient> {
            self.tokens.lock().unwrap().push(token);
            Box::new(CannedClient {
                calls: self.calls.clone(),
            })
        }
    }

    fn config() -> Config {
        Config {
            google_maps_api_key: "maps-key".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_anonymous_page_makes_no_remote_calls() {
        let factory = RecordingFactory::default();
        let session = FakeSession {
            authenticated: false,
            token: None,
        };

        let page = build_index_page(&config(), &session, &factory, Utc::now()).await;

        assert!(!page.is_authenticated);
        assert_eq!(page.api_key, "maps-key");
        assert!(page.user_location.is_none());
        assert!(factory.tokens.lock().unwrap().is_empty());
        assert_eq!(factory.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_authenticated_page_has_location() {
        let factory = RecordingFactory::default();
        let session = FakeSession {
            authenticated: true,
            token: Some("ya29.token"),
        };

        let page = build_index_page(&config(), &session, &factory, Utc::now()).await;

        assert!(page.is_authenticated);
        assert_eq!(page.user_location, Some(Coordinate::new(37.7749, -122.4194)));
        assert_eq!(
            *factory.tokens.lock().unwrap(),
            vec![AccessToken::new("ya29.token")]
        );
        assert_eq!(factory.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_authenticated_without_token_has_no_location() {
        let factory = RecordingFactory::default();
        let session = FakeSession {
            authenticated: true,
            token: None,
        };

        let page = build_index_page(&config(), &session, &factory, Utc::now()).await;

        assert!(page.is_authenticated);
        assert!(page.user_location.is_none());
        assert_eq!(factory.calls.load(Ordering::SeqCst), 0);
    }
}
