// ABOUTME: reqwest-backed client for the cloud console backend
// Implements the provisioning, checklist and stats seams over the `/services` REST routes

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{ApiError, ApiResult, ChecklistApi, ProvisioningApi, StatsApi};
use crate::config::ApiConfig;
use crate::models::{
    ChecklistProgress, ChecklistUpdate, CloudFlavor, CloudImage, CloudNetwork,
    CreateServerPayload, DashboardStats, ProvisionableResource,
};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct CloudApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl CloudApiClient {
    /// Build a client from the `[api]` config section
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.validated_base_url()?;

        let client = Client::builder()
            .user_agent(concat!("skydeck/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: format!("{}/services", base_url.as_str().trim_end_matches('/')),
            token: config.token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self
            .client
            .request(method, url)
            .header("Content-Type", "application/json");
        match &self.token {
            Some(token) => builder.header("Authorization", format!("Token {token}")),
            None => builder,
        }
    }

    /// Send a request, mapping non-2xx responses to `ApiError::Status`
    async fn dispatch(builder: RequestBuilder) -> ApiResult<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail)
            .map(|d| match d {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });
        debug!(status = status.as_u16(), ?detail, "Backend returned an error");
        Err(ApiError::status(status.as_u16(), detail))
    }

    async fn fetch<T: DeserializeOwned>(builder: RequestBuilder) -> ApiResult<T> {
        let response = Self::dispatch(builder).await?;
        Ok(response.json::<T>().await?)
    }

    /// Fetch a JSON array. A non-array body is read as empty; malformed items are skipped.
    async fn fetch_list<T: DeserializeOwned>(builder: RequestBuilder) -> ApiResult<Vec<T>> {
        let value: serde_json::Value = Self::fetch(builder).await?;
        let serde_json::Value::Array(items) = value else {
            warn!("Expected a JSON array from the backend, treating as empty");
            return Ok(Vec::new());
        };

        Ok(items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<T>(item) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed list entry");
                    None
                }
            })
            .collect())
    }

    async fn acknowledge(builder: RequestBuilder) -> ApiResult<()> {
        Self::dispatch(builder).await.map(|_| ())
    }
}

#[async_trait]
impl ProvisioningApi for CloudApiClient {
    async fn list_images(&self) -> ApiResult<Vec<CloudImage>> {
        Self::fetch_list(self.request(Method::GET, "cloud/images/")).await
    }

    async fn list_flavors(&self) -> ApiResult<Vec<CloudFlavor>> {
        Self::fetch_list(self.request(Method::GET, "cloud/flavors/")).await
    }

    async fn list_networks(&self) -> ApiResult<Vec<CloudNetwork>> {
        Self::fetch_list(self.request(Method::GET, "cloud/networks/")).await
    }

    async fn create(&self, payload: &CreateServerPayload) -> ApiResult<ProvisionableResource> {
        Self::fetch(self.request(Method::POST, "cloud/servers/").json(payload)).await
    }

    async fn list(&self) -> ApiResult<Vec<ProvisionableResource>> {
        Self::fetch_list(self.request(Method::GET, "cloud/servers/")).await
    }

    async fn start(&self, id: &str) -> ApiResult<()> {
        Self::acknowledge(self.request(Method::POST, &format!("cloud/servers/{id}/start/"))).await
    }

    async fn stop(&self, id: &str) -> ApiResult<()> {
        Self::acknowledge(self.request(Method::POST, &format!("cloud/servers/{id}/stop/"))).await
    }

    async fn reboot(&self, id: &str) -> ApiResult<()> {
        Self::acknowledge(self.request(Method::POST, &format!("cloud/servers/{id}/reboot/")))
            .await
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        Self::acknowledge(self.request(Method::DELETE, &format!("cloud/servers/{id}/"))).await
    }
}

#[async_trait]
impl ChecklistApi for CloudApiClient {
    async fn get_checklist(&self) -> ApiResult<ChecklistProgress> {
        Self::fetch(self.request(Method::GET, "onboarding/checklist/")).await
    }

    async fn update_checklist(&self, update: &ChecklistUpdate) -> ApiResult<ChecklistProgress> {
        Self::fetch(
            self.request(Method::PATCH, "onboarding/checklist/update/")
                .json(update),
        )
        .await
    }
}

#[async_trait]
impl StatsApi for CloudApiClient {
    async fn get_stats(&self) -> ApiResult<DashboardStats> {
        Self::fetch(self.request(Method::GET, "onboarding/stats/")).await
    }
}
