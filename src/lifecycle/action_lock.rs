// ABOUTME: Keyed registry of in-flight resource actions
// At most one action per resource id; the lock is released when its guard drops

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::debug;

/// Mutating action that can be applied to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Start,
    Stop,
    Reboot,
    Delete,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Reboot => "reboot",
            Self::Delete => "delete",
        }
    }

    /// Label shown next to a resource while the action is outstanding
    pub fn progress_label(&self) -> &'static str {
        match self {
            Self::Start => "Starting…",
            Self::Stop => "Stopping…",
            Self::Reboot => "Rebooting…",
            Self::Delete => "Deleting…",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("resource {resource_id} is busy with {held}")]
pub struct ResourceBusy {
    pub resource_id: String,
    pub held: ActionKind,
}

type LockTable = Arc<Mutex<HashMap<String, ActionKind>>>;

/// Shared table of `resource id → action in flight`
#[derive(Debug, Clone, Default)]
pub struct ActionLockRegistry {
    table: LockTable,
}

impl ActionLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<String, ActionKind>> {
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claim `resource_id` for `kind`, or report the action already holding it
    pub fn try_acquire(
        &self,
        resource_id: &str,
        kind: ActionKind,
    ) -> Result<ActionLockGuard, ResourceBusy> {
        let mut table = self.table();
        if let Some(held) = table.get(resource_id) {
            return Err(ResourceBusy {
                resource_id: resource_id.to_string(),
                held: *held,
            });
        }
        table.insert(resource_id.to_string(), kind);
        debug!(resource_id, action = %kind, "Action lock acquired");

        Ok(ActionLockGuard {
            table: Arc::clone(&self.table),
            resource_id: resource_id.to_string(),
            kind,
        })
    }

    /// Action currently holding `resource_id`, if any
    pub fn held(&self, resource_id: &str) -> Option<ActionKind> {
        self.table().get(resource_id).copied()
    }

    pub fn is_locked(&self, resource_id: &str) -> bool {
        self.held(resource_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }

    pub fn snapshot(&self) -> HashMap<String, ActionKind> {
        self.table().clone()
    }
}

/// Proof that an action holds its resource. Dropping it releases the lock.
#[derive(Debug)]
pub struct ActionLockGuard {
    table: LockTable,
    resource_id: String,
    kind: ActionKind,
}

impl ActionLockGuard {
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }
}

impl Drop for ActionLockGuard {
    fn drop(&mut self) {
        let mut table = self
            .table
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        table.remove(&self.resource_id);
        debug!(resource_id = %self.resource_id, action = %self.kind, "Action lock released");
    }
}
