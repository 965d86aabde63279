// ABOUTME: Multi-step server provisioning wizard
// Gates each step on its selections, builds the create payload and drives submission to success

use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{OnceCell, watch};
use tracing::{debug, info, warn};

use super::catalog::load_catalogs;
use super::checklist_sync::ChecklistSynchronizer;
use super::session::ViewSession;
use crate::api::{ApiError, ProvisioningApi};
use crate::models::{
    ChecklistStep, CreateServerPayload, OptionCatalogs, ProvisionableResource,
};
use crate::preview::{self, ServerForm, SummaryRow};

pub const BACKEND_UNAVAILABLE_MESSAGE: &str = "The provisioning backend is not connected. \
Configure your cloud credentials in Settings to provision real servers.";

pub const CREATE_FAILED_MESSAGE: &str = "Failed to create server. Please try again.";

/// Shortest accepted server name, counted after trimming
pub const MIN_NAME_LEN: usize = 2;

pub const DEFAULT_SUCCESS_DELAY: Duration = Duration::from_millis(1500);

/// Steps in the provisioning wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WizardStep {
    ChooseImage,
    ChooseFlavor,
    NetworkAndName,
}

impl WizardStep {
    pub fn all() -> &'static [WizardStep] {
        &[Self::ChooseImage, Self::ChooseFlavor, Self::NetworkAndName]
    }

    /// Zero-based position
    pub fn index(&self) -> usize {
        match self {
            Self::ChooseImage => 0,
            Self::ChooseFlavor => 1,
            Self::NetworkAndName => 2,
        }
    }

    pub fn total() -> usize {
        3
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ChooseImage => "Choose Image",
            Self::ChooseFlavor => "Choose Flavor",
            Self::NetworkAndName => "Network & Name",
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            Self::ChooseImage => Some(Self::ChooseFlavor),
            Self::ChooseFlavor => Some(Self::NetworkAndName),
            Self::NetworkAndName => None,
        }
    }

    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::ChooseImage => None,
            Self::ChooseFlavor => Some(Self::ChooseImage),
            Self::NetworkAndName => Some(Self::ChooseFlavor),
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// What the user has picked so far. Ids refer to the loaded catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardSelections {
    pub image_id: Option<String>,
    pub flavor_id: Option<String>,
    /// `None` is the default network
    pub network_id: Option<String>,
    pub name: String,
    pub key_name: String,
}

impl WizardSelections {
    pub fn is_step_valid(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::ChooseImage => self.image_id.is_some(),
            WizardStep::ChooseFlavor => self.flavor_id.is_some(),
            WizardStep::NetworkAndName => self.name.trim().chars().count() >= MIN_NAME_LEN,
        }
    }

    /// First step whose requirement is not met
    pub fn first_incomplete(&self) -> Option<WizardStep> {
        WizardStep::all()
            .iter()
            .copied()
            .find(|step| !self.is_step_valid(*step))
    }

    /// Create payload built only from the selections; blank optionals are omitted
    pub fn build_payload(&self) -> Result<CreateServerPayload, WizardError> {
        if let Some(step) = self.first_incomplete() {
            return Err(WizardError::StepIncomplete(step));
        }
        let (Some(image_id), Some(flavor_id)) = (&self.image_id, &self.flavor_id) else {
            return Err(WizardError::StepIncomplete(WizardStep::ChooseImage));
        };

        Ok(CreateServerPayload {
            name: self.name.trim().to_string(),
            image_id: image_id.clone(),
            flavor_id: flavor_id.clone(),
            network_id: non_blank(self.network_id.as_deref()),
            key_name: non_blank(Some(&self.key_name)),
            wait: false,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardPhase {
    Editing,
    Submitting,
    Success,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub step: WizardStep,
    pub selections: WizardSelections,
    pub phase: WizardPhase,
    /// User-visible message from the last failed submission
    pub error: Option<String>,
    pub created: Option<ProvisionableResource>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: WizardStep::ChooseImage,
            selections: WizardSelections::default(),
            phase: WizardPhase::Editing,
            error: None,
            created: None,
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum WizardError {
    #[error("{0} is incomplete")]
    StepIncomplete(WizardStep),
    #[error("already at the last step, submit instead")]
    AtFinalStep,
    #[error("cannot submit from {0}, finish the remaining steps first")]
    NotAtFinalStep(WizardStep),
    #[error("options have not been loaded yet")]
    OptionsNotLoaded,
    #[error("unknown {kind} '{id}'")]
    UnknownOption { kind: &'static str, id: String },
    #[error("cannot {action} while the wizard is {phase:?}")]
    InvalidPhase {
        action: &'static str,
        phase: WizardPhase,
    },
    #[error("{message}")]
    BackendUnavailable {
        message: String,
        #[source]
        source: ApiError,
    },
    #[error("{message}")]
    CreateFailed {
        message: String,
        #[source]
        source: ApiError,
    },
}

impl WizardError {
    fn from_create_failure(source: ApiError) -> Self {
        if source.is_backend_unavailable() {
            Self::BackendUnavailable {
                message: BACKEND_UNAVAILABLE_MESSAGE.to_string(),
                source,
            }
        } else {
            Self::CreateFailed {
                message: source.detail().unwrap_or(CREATE_FAILED_MESSAGE).to_string(),
                source,
            }
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::StepIncomplete(_) | Self::AtFinalStep | Self::NotAtFinalStep(_)
        )
    }
}

pub struct WizardController {
    api: Arc<dyn ProvisioningApi>,
    checklist: Option<Arc<ChecklistSynchronizer>>,
    catalogs: OnceCell<OptionCatalogs>,
    state: Mutex<WizardState>,
    phase_tx: watch::Sender<WizardPhase>,
    session: ViewSession,
    success_delay: Duration,
}

impl WizardController {
    pub fn new(api: Arc<dyn ProvisioningApi>) -> Self {
        let (phase_tx, _) = watch::channel(WizardPhase::Editing);
        Self {
            api,
            checklist: None,
            catalogs: OnceCell::new(),
            state: Mutex::new(WizardState::default()),
            phase_tx,
            session: ViewSession::new(),
            success_delay: DEFAULT_SUCCESS_DELAY,
        }
    }

    /// Mark the "create a VM" onboarding step after each successful create
    pub fn with_checklist(mut self, checklist: Arc<ChecklistSynchronizer>) -> Self {
        self.checklist = Some(checklist);
        self
    }

    pub fn with_success_delay(mut self, delay: Duration) -> Self {
        self.success_delay = delay;
        self
    }

    fn lock(&self) -> MutexGuard<'_, WizardState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_phase(state: &mut WizardState, tx: &watch::Sender<WizardPhase>, phase: WizardPhase) {
        state.phase = phase;
        tx.send_replace(phase);
    }

    fn editing(&self, action: &'static str) -> Result<MutexGuard<'_, WizardState>, WizardError> {
        let state = self.lock();
        if state.phase == WizardPhase::Editing {
            Ok(state)
        } else {
            Err(WizardError::InvalidPhase {
                action,
                phase: state.phase,
            })
        }
    }

    pub fn state(&self) -> WizardState {
        self.lock().clone()
    }

    pub fn step(&self) -> WizardStep {
        self.lock().step
    }

    pub fn phase(&self) -> WizardPhase {
        self.lock().phase
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WizardPhase> {
        self.phase_tx.subscribe()
    }

    pub fn can_advance(&self, step: WizardStep) -> bool {
        self.lock().selections.is_step_valid(step)
    }

    /// Move forward one step if the current one is satisfied
    pub fn next(&self) -> Result<WizardStep, WizardError> {
        let mut state = self.editing("advance")?;
        if !state.selections.is_step_valid(state.step) {
            debug!(step = %state.step, "Refusing to advance past an incomplete step");
            return Err(WizardError::StepIncomplete(state.step));
        }
        let next = state.step.next().ok_or(WizardError::AtFinalStep)?;
        state.step = next;
        Ok(next)
    }

    /// Move back one step; a no-op on the first step
    pub fn back(&self) -> WizardStep {
        let mut state = self.lock();
        if state.phase == WizardPhase::Editing {
            if let Some(previous) = state.step.previous() {
                state.step = previous;
            }
        }
        state.step
    }

    /// Load the option catalogs once for the lifetime of this controller
    pub async fn load_options(&self) -> &OptionCatalogs {
        self.catalogs
            .get_or_init(|| async {
                let catalogs = load_catalogs(self.api.as_ref()).await;
                info!(
                    images = catalogs.images.len(),
                    flavors = catalogs.flavors.len(),
                    networks = catalogs.networks.len(),
                    "Wizard options loaded"
                );
                catalogs
            })
            .await
    }

    pub fn options(&self) -> Option<&OptionCatalogs> {
        self.catalogs.get()
    }

    fn loaded(&self) -> Result<&OptionCatalogs, WizardError> {
        self.catalogs.get().ok_or(WizardError::OptionsNotLoaded)
    }

    pub fn select_image(&self, image_id: &str) -> Result<(), WizardError> {
        let catalogs = self.loaded()?;
        let image = catalogs.image(image_id).ok_or_else(|| WizardError::UnknownOption {
            kind: "image",
            id: image_id.to_string(),
        })?;
        self.editing("select an image")?.selections.image_id = Some(image.image_id.clone());
        Ok(())
    }

    pub fn select_flavor(&self, flavor_id: &str) -> Result<(), WizardError> {
        let catalogs = self.loaded()?;
        let flavor = catalogs
            .flavor(flavor_id)
            .ok_or_else(|| WizardError::UnknownOption {
                kind: "flavor",
                id: flavor_id.to_string(),
            })?;
        self.editing("select a flavor")?.selections.flavor_id = Some(flavor.flavor_id.clone());
        Ok(())
    }

    /// `None` selects the default network
    pub fn select_network(&self, network_id: Option<&str>) -> Result<(), WizardError> {
        let resolved = match network_id {
            Some(id) => {
                let network =
                    self.loaded()?
                        .network(id)
                        .ok_or_else(|| WizardError::UnknownOption {
                            kind: "network",
                            id: id.to_string(),
                        })?;
                Some(network.id.clone())
            }
            None => None,
        };
        self.editing("select a network")?.selections.network_id = resolved;
        Ok(())
    }

    pub fn set_name(&self, name: &str) -> Result<(), WizardError> {
        self.editing("edit the name")?.selections.name = name.to_string();
        Ok(())
    }

    pub fn set_key_name(&self, key_name: &str) -> Result<(), WizardError> {
        self.editing("edit the key name")?.selections.key_name = key_name.to_string();
        Ok(())
    }

    fn with_form<R>(&self, f: impl FnOnce(&ServerForm<'_>) -> R) -> R {
        let state = self.lock();
        let selections = &state.selections;
        let catalogs = self.catalogs.get();
        let form = ServerForm {
            name: &selections.name,
            image: catalogs
                .zip(selections.image_id.as_deref())
                .and_then(|(c, id)| c.image(id)),
            flavor: catalogs
                .zip(selections.flavor_id.as_deref())
                .and_then(|(c, id)| c.flavor(id)),
            network: catalogs
                .zip(selections.network_id.as_deref())
                .and_then(|(c, id)| c.network(id)),
            key_name: Some(selections.key_name.as_str()),
        };
        f(&form)
    }

    /// Summary rows for the final step
    pub fn summary(&self) -> Vec<SummaryRow> {
        self.with_form(|form| form.summary())
    }

    /// Configuration preview of the pending server
    pub fn preview(&self) -> String {
        self.with_form(|form| preview::render(form))
    }

    /// Submit the selections. Only accepted from the last step.
    ///
    /// On success the checklist's create step is marked, the wizard shows success for the
    /// configured delay, then resets and runs `on_complete` if it is still open. On failure
    /// the wizard stays on the current step with a user-visible error.
    pub async fn submit<F, Fut>(&self, on_complete: F) -> Result<ProvisionableResource, WizardError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let payload = {
            let mut state = self.editing("submit")?;
            let payload = state.selections.build_payload()?;
            if state.step.next().is_some() {
                return Err(WizardError::NotAtFinalStep(state.step));
            }
            state.error = None;
            Self::set_phase(&mut state, &self.phase_tx, WizardPhase::Submitting);
            payload
        };
        let token = self.session.token();
        info!(name = %payload.name, image = %payload.image_id, flavor = %payload.flavor_id, "Submitting server");

        let resource = match self.api.create(&payload).await {
            Ok(resource) => resource,
            Err(source) => {
                let err = WizardError::from_create_failure(source);
                warn!(error = %err, "Server creation failed");
                if self.session.is_current(&token) {
                    let mut state = self.lock();
                    state.error = Some(err.to_string());
                    Self::set_phase(&mut state, &self.phase_tx, WizardPhase::Editing);
                }
                return Err(err);
            }
        };

        info!(resource_id = %resource.id, "Server created");
        if let Some(checklist) = &self.checklist {
            if let Err(e) = checklist.mark(ChecklistStep::CreateVm).await {
                debug!(error = %e, "Onboarding step not recorded");
            }
        }

        if !self.session.is_current(&token) {
            debug!("Wizard closed during submission, skipping completion");
            return Ok(resource);
        }
        {
            let mut state = self.lock();
            state.created = Some(resource.clone());
            Self::set_phase(&mut state, &self.phase_tx, WizardPhase::Success);
        }

        tokio::time::sleep(self.success_delay).await;

        if self.session.is_current(&token) {
            self.reset(WizardPhase::Editing);
            on_complete().await;
        } else {
            debug!("Wizard closed before the success delay elapsed");
        }
        Ok(resource)
    }

    fn reset(&self, phase: WizardPhase) {
        let mut state = self.lock();
        *state = WizardState::default();
        Self::set_phase(&mut state, &self.phase_tx, phase);
    }

    /// User-initiated cancel: discard selections and drop any outstanding continuation
    pub fn cancel(&self) {
        info!("Wizard cancelled");
        self.close();
    }

    /// Close the wizard. Cached catalogs are kept for the next open.
    pub fn close(&self) {
        self.session.invalidate();
        self.reset(WizardPhase::Cancelled);
    }

    /// Start a fresh run after a close
    pub fn reopen(&self) {
        self.reset(WizardPhase::Editing);
    }
}
