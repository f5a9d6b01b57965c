//! reqwest implementation of [`ApiClient`]

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{ApiClient, ApiConnector, SharedApiClient};
use crate::error::{Result, WhaleError};
use crate::models::{Sighting, SightingId, User};

/// HTTP client for the sightings API
#[derive(Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = reqwest::Url::parse(base_url).map_err(|e| WhaleError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(WhaleError::InvalidBaseUrl {
                url: base_url.to_string(),
                message: "scheme must be http or https".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WhaleError::Internal {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
        })
    }

    /// Same client, authenticating as the given bearer token
    pub fn with_access_token(&self, access_token: Option<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            access_token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn execute(&self, method: Method, endpoint: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| WhaleError::Transport {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} answered {}", endpoint, status);
            return Err(WhaleError::from_status(endpoint, status.as_u16()));
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.execute(Method::GET, endpoint).await?;
        response.json::<T>().await.map_err(|e| WhaleError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    async fn get_sightings(&self, endpoint: &str) -> Result<Vec<Sighting>> {
        let sightings: Vec<Sighting> = self.get_json(endpoint).await?;
        for sighting in sightings.iter().filter(|s| !s.is_consistent()) {
            warn!(
                "Sighting {} has an orca type but species {}",
                sighting.id, sighting.species
            );
        }
        Ok(sightings)
    }

    async fn send_empty(&self, method: Method, endpoint: &str) -> Result<()> {
        // Body is ignored, the status is all that matters
        self.execute(method, endpoint).await.map(|_| ())
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn fetch_current_user(&self) -> Result<User> {
        self.get_json("/api/users/current").await
    }

    async fn fetch_current_user_sightings(&self, page: u32) -> Result<Vec<Sighting>> {
        self.get_sightings(&format!("/api/users/current/sightings?pageNumber={}", page))
            .await
    }

    async fn fetch_pending_sightings(&self, page: u32) -> Result<Vec<Sighting>> {
        self.get_sightings(&format!("/api/sightings/pending?pageNumber={}", page))
            .await
    }

    async fn check_admin(&self) -> Result<bool> {
        self.get_json("/api/users/checkadmin").await
    }

    async fn make_admin(&self) -> Result<()> {
        self.send_empty(Method::POST, "/api/users/makeadmin").await
    }

    async fn remove_admin(&self) -> Result<()> {
        self.send_empty(Method::POST, "/api/users/removeadmin").await
    }

    async fn confirm_sighting(&self, id: SightingId) -> Result<()> {
        self.send_empty(Method::PUT, &format!("/api/sightings/{}/confirm", id))
            .await
    }

    async fn delete_sighting(&self, id: SightingId) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("/api/sightings/{}", id))
            .await
    }
}

/// Hands out per-session clients that share one connection pool
#[derive(Clone)]
pub struct HttpConnector {
    client: HttpApiClient,
}

impl HttpConnector {
    pub fn new(client: HttpApiClient) -> Self {
        Self { client }
    }
}

impl ApiConnector for HttpConnector {
    fn connect(&self, access_token: Option<String>) -> SharedApiClient {
        Arc::new(self.client.with_access_token(access_token))
    }
}
