// ABOUTME: Resource action coordinator - owns the resource list and issues start/stop/reboot/delete
// Actions are serialized per resource through the lock registry; the list is refreshed after each one

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::action_lock::{ActionKind, ActionLockRegistry, ResourceBusy};
use super::session::ViewSession;
use crate::api::{ApiError, ProvisioningApi};
use crate::models::{ProvisionableResource, StatusStyle};

/// Shown when the list fails for a reason other than an unconfigured backend
pub const LIST_FAILURE_MESSAGE: &str = "Could not load virtual machines.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error(transparent)]
    Busy(#[from] ResourceBusy),
    #[error("{action} failed for {resource_id}: {source}")]
    Api {
        resource_id: String,
        action: ActionKind,
        #[source]
        source: ApiError,
    },
}

impl ActionError {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy(_))
    }
}

#[derive(Debug, Default)]
struct ResourceListState {
    resources: Vec<ProvisionableResource>,
    last_error: Option<String>,
    loading: bool,
}

/// One resource as a list view renders it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRow {
    pub id: String,
    pub name: String,
    pub status: StatusStyle,
    pub ip: String,
    pub flavor: String,
    pub created: String,
    /// Action in flight, shown as an in-progress indicator
    pub busy: Option<ActionKind>,
    pub can_start: bool,
    pub can_stop: bool,
    pub can_reboot: bool,
    pub can_delete: bool,
}

impl ResourceRow {
    fn new(resource: &ProvisionableResource, busy: Option<ActionKind>) -> Self {
        let idle = busy.is_none();
        Self {
            id: resource.id.clone(),
            name: resource.name.clone(),
            status: resource.status.style(),
            ip: resource.ip_display().to_string(),
            flavor: resource.flavor_display().to_string(),
            created: resource.created_display(),
            busy,
            can_start: idle && resource.status.is_stopped(),
            can_stop: idle && resource.status.is_running(),
            can_reboot: idle && resource.status.is_running(),
            can_delete: idle,
        }
    }
}

pub struct ResourceActionCoordinator {
    api: Arc<dyn ProvisioningApi>,
    locks: ActionLockRegistry,
    state: RwLock<ResourceListState>,
    view: ViewSession,
}

impl ResourceActionCoordinator {
    pub fn new(api: Arc<dyn ProvisioningApi>) -> Self {
        Self::with_locks(api, ActionLockRegistry::new())
    }

    /// Share a lock registry with other coordinators over the same backend
    pub fn with_locks(api: Arc<dyn ProvisioningApi>, locks: ActionLockRegistry) -> Self {
        Self {
            api,
            locks,
            state: RwLock::new(ResourceListState::default()),
            view: ViewSession::new(),
        }
    }

    pub fn locks(&self) -> &ActionLockRegistry {
        &self.locks
    }

    /// Snapshot of the current collection
    pub async fn resources(&self) -> Vec<ProvisionableResource> {
        self.state.read().await.resources.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub fn action_in_flight(&self, resource_id: &str) -> Option<ActionKind> {
        self.locks.held(resource_id)
    }

    /// Rows for rendering, each tagged with its in-flight action
    pub async fn rows(&self) -> Vec<ResourceRow> {
        let state = self.state.read().await;
        state
            .resources
            .iter()
            .map(|r| ResourceRow::new(r, self.locks.held(&r.id)))
            .collect()
    }

    /// Drop updates from calls issued before now; later calls apply normally
    pub fn detach_view(&self) {
        debug!("Resource view detached, outstanding results will be discarded");
        self.view.invalidate();
    }

    /// Re-fetch the full list.
    ///
    /// An unconfigured backend yields an empty list without an error. Other failures keep
    /// the previous list and record a user-visible message.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let token = self.view.token();
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.last_error = None;
        }

        let result = self.api.list().await;

        let mut state = self.state.write().await;
        state.loading = false;
        if !self.view.is_current(&token) {
            debug!("Discarding list result for a detached view");
            return result.map(|_| ());
        }

        match result {
            Ok(resources) => {
                debug!(count = resources.len(), "Resource list refreshed");
                state.resources = resources;
                Ok(())
            }
            Err(e) if e.is_backend_unavailable() => {
                info!("Provisioning backend not configured, showing an empty list");
                state.resources.clear();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to refresh resource list");
                state.last_error = Some(e.detail().unwrap_or(LIST_FAILURE_MESSAGE).to_string());
                Err(e)
            }
        }
    }

    pub async fn start(&self, resource_id: &str) -> Result<(), ActionError> {
        self.transition(resource_id, ActionKind::Start).await
    }

    pub async fn stop(&self, resource_id: &str) -> Result<(), ActionError> {
        self.transition(resource_id, ActionKind::Stop).await
    }

    pub async fn reboot(&self, resource_id: &str) -> Result<(), ActionError> {
        self.transition(resource_id, ActionKind::Reboot).await
    }

    /// Run a state-changing action, then refresh whatever its outcome
    async fn transition(&self, resource_id: &str, kind: ActionKind) -> Result<(), ActionError> {
        let _guard = self.locks.try_acquire(resource_id, kind)?;
        info!(resource_id, action = %kind, "Dispatching resource action");

        let result = match kind {
            ActionKind::Start => self.api.start(resource_id).await,
            ActionKind::Stop => self.api.stop(resource_id).await,
            ActionKind::Reboot => self.api.reboot(resource_id).await,
            ActionKind::Delete => self.api.delete(resource_id).await,
        };

        if let Err(e) = &result {
            debug!(resource_id, action = %kind, error = %e, "Resource action failed");
        }

        if let Err(e) = self.refresh().await {
            debug!(resource_id, error = %e, "Refresh after action failed");
        }

        result.map_err(|source| ActionError::Api {
            resource_id: resource_id.to_string(),
            action: kind,
            source,
        })
    }

    /// Delete and, once acknowledged, remove the resource locally without a refresh
    pub async fn delete(&self, resource_id: &str) -> Result<(), ActionError> {
        let _guard = self.locks.try_acquire(resource_id, ActionKind::Delete)?;
        let token = self.view.token();
        info!(resource_id, "Deleting resource");

        match self.api.delete(resource_id).await {
            Ok(()) => {
                if self.view.is_current(&token) {
                    self.state
                        .write()
                        .await
                        .resources
                        .retain(|r| r.id != resource_id);
                }
                Ok(())
            }
            Err(source) => {
                debug!(resource_id, error = %source, "Delete failed, keeping resource");
                Err(ActionError::Api {
                    resource_id: resource_id.to_string(),
                    action: ActionKind::Delete,
                    source,
                })
            }
        }
    }
}
