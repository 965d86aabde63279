// ABOUTME: Onboarding checklist synchronizer - best-effort step markers followed by a progress refetch
// The displayed percentage is always the last value the checklist API returned

use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::session::ViewSession;
use crate::api::{ApiError, ChecklistApi};
use crate::models::{ChecklistProgress, ChecklistStep, ChecklistUpdate};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChecklistError {
    #[error("already marking {0}")]
    Busy(ChecklistStep),
    #[error("failed to update checklist step {step}: {source}")]
    Update {
        step: ChecklistStep,
        #[source]
        source: ApiError,
    },
}

/// One checklist entry as the panel shows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistRow {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub action_label: &'static str,
    pub done: bool,
}

pub struct ChecklistSynchronizer {
    api: Arc<dyn ChecklistApi>,
    progress: RwLock<Option<ChecklistProgress>>,
    marking: Mutex<Option<ChecklistStep>>,
    view: ViewSession,
}

impl ChecklistSynchronizer {
    pub fn new(api: Arc<dyn ChecklistApi>) -> Self {
        Self {
            api,
            progress: RwLock::new(None),
            marking: Mutex::new(None),
            view: ViewSession::new(),
        }
    }

    pub async fn progress(&self) -> Option<ChecklistProgress> {
        self.progress.read().await.clone()
    }

    /// Last server-reported completion percentage, 0 before the first fetch
    pub async fn percentage(&self) -> u8 {
        self.progress
            .read()
            .await
            .as_ref()
            .map_or(0, |p| p.completion_pct)
    }

    pub async fn is_complete(&self, step: ChecklistStep) -> bool {
        self.progress
            .read()
            .await
            .as_ref()
            .is_some_and(|p| p.is_complete(step))
    }

    pub async fn all_done(&self) -> bool {
        let progress = self.progress.read().await;
        progress
            .as_ref()
            .is_some_and(|p| ChecklistStep::all().iter().all(|s| p.is_complete(*s)))
    }

    pub async fn rows(&self) -> Vec<ChecklistRow> {
        let progress = self.progress.read().await;
        ChecklistStep::all()
            .iter()
            .map(|step| ChecklistRow {
                key: step.key(),
                label: step.label(),
                description: step.description(),
                action_label: step.action_label(),
                done: progress.as_ref().is_some_and(|p| p.is_complete(*step)),
            })
            .collect()
    }

    /// Step currently being marked through [`Self::mark_complete`]
    pub fn marking(&self) -> Option<ChecklistStep> {
        *self.marking_slot()
    }

    pub fn detach_view(&self) {
        self.view.invalidate();
    }

    /// Fetch the checklist and replace the displayed progress
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let token = self.view.token();
        let progress = self.api.get_checklist().await?;
        if self.view.is_current(&token) {
            self.apply(progress).await;
        }
        Ok(())
    }

    /// Refresh, logging instead of returning a failure
    pub async fn refresh_quietly(&self) {
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Failed to load onboarding checklist");
        }
    }

    /// Mark `step` complete, then run `refresh` whatever the update's outcome.
    ///
    /// An update failure is logged and returned; callers are free to ignore it.
    pub async fn mark_step<F>(&self, step: ChecklistStep, refresh: F) -> Result<(), ChecklistError>
    where
        F: Future<Output = ()>,
    {
        let token = self.view.token();
        let result = self.api.update_checklist(&ChecklistUpdate::mark(step)).await;

        let outcome = match result {
            Ok(progress) => {
                info!(step = %step, pct = progress.completion_pct, "Checklist step marked");
                if self.view.is_current(&token) {
                    self.apply(progress).await;
                }
                Ok(())
            }
            Err(source) => {
                warn!(step = %step, error = %source, "Failed to update checklist");
                Err(ChecklistError::Update { step, source })
            }
        };

        refresh.await;
        outcome
    }

    /// Mark `step` and refetch this synchronizer's own progress
    pub async fn mark(&self, step: ChecklistStep) -> Result<(), ChecklistError> {
        self.mark_step(step, self.refresh_quietly()).await
    }

    /// Manual "mark complete" action; a second request while one is pending is ignored
    pub async fn mark_complete(&self, step: ChecklistStep) -> Result<(), ChecklistError> {
        let _marking = self.claim_marking(step)?;
        self.mark(step).await
    }

    fn claim_marking(&self, step: ChecklistStep) -> Result<MarkingGuard<'_>, ChecklistError> {
        let mut slot = self.marking_slot();
        if let Some(current) = *slot {
            debug!(step = %step, pending = %current, "Ignoring mark request while another is pending");
            return Err(ChecklistError::Busy(current));
        }
        *slot = Some(step);
        Ok(MarkingGuard {
            slot: &self.marking,
        })
    }

    fn marking_slot(&self) -> std::sync::MutexGuard<'_, Option<ChecklistStep>> {
        self.marking
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn apply(&self, progress: ChecklistProgress) {
        let mut current = self.progress.write().await;
        if let Some(previous) = current.as_ref() {
            if progress.completion_pct < previous.completion_pct {
                warn!(
                    previous = previous.completion_pct,
                    reported = progress.completion_pct,
                    "Checklist completion went down"
                );
            }
        }
        *current = Some(progress);
    }
}

/// Clears the pending manual mark when dropped, including on cancellation
struct MarkingGuard<'a> {
    slot: &'a Mutex<Option<ChecklistStep>>,
}

impl Drop for MarkingGuard<'_> {
    fn drop(&mut self) {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}
