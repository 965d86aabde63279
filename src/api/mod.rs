// ABOUTME: Seams to the remote provisioning, checklist and stats backends
// Orchestration code depends only on these traits; `client` is the HTTP implementation

pub mod client;
pub mod error;

pub use client::CloudApiClient;
pub use error::{ApiError, ApiResult, NOT_CONFIGURED_MARKER, SERVICE_UNAVAILABLE};

use async_trait::async_trait;

use crate::models::{
    ChecklistProgress, ChecklistUpdate, CloudFlavor, CloudImage, CloudNetwork,
    CreateServerPayload, DashboardStats, ProvisionableResource,
};

/// Compute provisioning backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProvisioningApi: Send + Sync {
    async fn list_images(&self) -> ApiResult<Vec<CloudImage>>;
    async fn list_flavors(&self) -> ApiResult<Vec<CloudFlavor>>;
    async fn list_networks(&self) -> ApiResult<Vec<CloudNetwork>>;
    async fn create(&self, payload: &CreateServerPayload) -> ApiResult<ProvisionableResource>;
    async fn list(&self) -> ApiResult<Vec<ProvisionableResource>>;
    async fn start(&self, id: &str) -> ApiResult<()>;
    async fn stop(&self, id: &str) -> ApiResult<()>;
    async fn reboot(&self, id: &str) -> ApiResult<()>;
    async fn delete(&self, id: &str) -> ApiResult<()>;
}

/// Onboarding checklist backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChecklistApi: Send + Sync {
    async fn get_checklist(&self) -> ApiResult<ChecklistProgress>;
    async fn update_checklist(&self, update: &ChecklistUpdate) -> ApiResult<ChecklistProgress>;
}

/// Dashboard statistics backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsApi: Send + Sync {
    async fn get_stats(&self) -> ApiResult<DashboardStats>;
}
