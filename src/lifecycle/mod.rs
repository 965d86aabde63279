// ABOUTME: Resource lifecycle orchestration - wizard, per-resource actions, checklist and stats
// Everything here talks to the backend only through the traits in `crate::api`

pub mod action_lock;
pub mod catalog;
pub mod checklist_sync;
pub mod coordinator;
pub mod refresh;
pub mod session;
pub mod stats;
pub mod wizard;

pub use action_lock::{ActionKind, ActionLockGuard, ActionLockRegistry, ResourceBusy};
pub use catalog::{fetch_or_fallback, load_catalogs};
pub use checklist_sync::{ChecklistError, ChecklistRow, ChecklistSynchronizer};
pub use coordinator::{ActionError, LIST_FAILURE_MESSAGE, ResourceActionCoordinator, ResourceRow};
pub use refresh::{DashboardRefresh, RefreshReport};
pub use session::{SessionToken, ViewSession};
pub use stats::{AggregatedStats, MISSING_VALUE, StatCard, StatsAggregator};
pub use wizard::{
    BACKEND_UNAVAILABLE_MESSAGE, CREATE_FAILED_MESSAGE, DEFAULT_SUCCESS_DELAY, WizardController,
    WizardError, WizardPhase, WizardSelections, WizardState, WizardStep,
};
