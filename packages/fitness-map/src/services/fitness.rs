use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::sync::Arc;

use crate::models::{DataSource, Dataset, ListDataSourcesResponse};
use crate::session::AccessToken;

/// Synthetic user id the Fitness API resolves to the token's owner
pub const CURRENT_USER: &str = "me";

#[derive(Debug, thiserror::Error)]
pub enum FitnessError {
    #[error("Fitness API request failed")]
    Transport(#[from] reqwest::Error),

    #[error("Fitness API returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid Fitness API base URL {0}")]
    InvalidBaseUrl(String),
}

/// Read operations against the user's fitness data
#[async_trait]
pub trait FitnessClient: Send + Sync {
    async fn list_data_sources(&self, user_id: &str) -> Result<Vec<DataSource>, FitnessError>;

    async fn get_dataset(
        &self,
        user_id: &str,
        data_source_id: &str,
        dataset_id: &str,
    ) -> Result<Dataset, FitnessError>;
}

/// Builds a client bound to one user's access token
pub trait FitnessClientFactory: Send + Sync {
    fn build(&self, token: AccessToken) -> Box<dyn FitnessClient>;
}

/// Factory for clients talking to the Google Fitness REST API
#[derive(Clone)]
pub struct GoogleFitnessClientFactory {
    http: reqwest::Client,
    base_url: Arc<Url>,
}

impl GoogleFitnessClientFactory {
    pub fn new(base_url: &str) -> Result<Self, FitnessError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FitnessError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(FitnessError::InvalidBaseUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
        })
    }
}

impl FitnessClientFactory for GoogleFitnessClientFactory {
    fn build(&self, token: AccessToken) -> Box<dyn FitnessClient> {
        Box::new(GoogleFitnessClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token,
        })
    }
}

pub struct GoogleFitnessClient {
    http: reqwest::Client,
    base_url: Arc<Url>,
    token: AccessToken,
}

impl GoogleFitnessClient {
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = (*self.base_url).clone();
        // Checked in GoogleFitnessClientFactory::new
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, FitnessError> {
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .bearer_auth(self.token.as_str())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FitnessError::Status { status, body });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl FitnessClient for GoogleFitnessClient {
    async fn list_data_sources(&self, user_id: &str) -> Result<Vec<DataSource>, FitnessError> {
        let url = self.endpoint(&["users", user_id, "dataSources"]);
        let response: ListDataSourcesResponse = self.get_json(url).await?;
        Ok(response.data_source)
    }

    async fn get_dataset(
        &self,
        user_id: &str,
        data_source_id: &str,
        dataset_id: &str,
    ) -> Result<Dataset, FitnessError> {
        let url = self.endpoint(&[
            "users",
            user_id,
            "dataSources",
            data_source_id,
            "datasets",
            dataset_id,
        ]);
        self.get_json(url).await
    }
}
