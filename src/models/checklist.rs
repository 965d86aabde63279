// ABOUTME: Onboarding checklist steps and the server-computed progress record
// The completion percentage is owned by the backend and only ever displayed here

use serde::{Deserialize, Serialize};

/// Steps in the getting-started checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistStep {
    VerifyEmail,
    AddSshKey,
    CreateVm,
    ConfigureNetwork,
    AttachVolume,
    ExploreDashboard,
}

impl ChecklistStep {
    /// Get all steps in display order
    pub fn all() -> &'static [ChecklistStep] {
        &[
            Self::VerifyEmail,
            Self::AddSshKey,
            Self::CreateVm,
            Self::ConfigureNetwork,
            Self::AttachVolume,
            Self::ExploreDashboard,
        ]
    }

    /// Field name used by the checklist API
    pub fn key(&self) -> &'static str {
        match self {
            Self::VerifyEmail => "verify_email",
            Self::AddSshKey => "add_ssh_key",
            Self::CreateVm => "create_vm",
            Self::ConfigureNetwork => "configure_network",
            Self::AttachVolume => "attach_volume",
            Self::ExploreDashboard => "explore_dashboard",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VerifyEmail => "Verify Account Email",
            Self::AddSshKey => "Add SSH Key",
            Self::CreateVm => "Create Your First VM",
            Self::ConfigureNetwork => "Configure Networking",
            Self::AttachVolume => "Attach a Volume",
            Self::ExploreDashboard => "Explore the Dashboard",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::VerifyEmail => {
                "Confirm your email address to activate your account and receive important notifications."
            }
            Self::AddSshKey => {
                "Upload your public SSH key to securely connect to virtual machines via terminal."
            }
            Self::CreateVm => "Deploy a virtual machine in seconds. Choose your OS, size, and region.",
            Self::ConfigureNetwork => {
                "Set up a Virtual Private Cloud (VPC) to isolate and secure your resources."
            }
            Self::AttachVolume => {
                "Create and attach a persistent block storage volume to your VM for data."
            }
            Self::ExploreDashboard => {
                "Familiarise yourself with monitoring, billing, and team management features."
            }
        }
    }

    pub fn action_label(&self) -> &'static str {
        match self {
            Self::VerifyEmail => "Verified automatically",
            Self::AddSshKey => "Add SSH Key",
            Self::CreateVm => "Create VM",
            Self::ConfigureNetwork => "Configure Network",
            Self::AttachVolume => "Create Volume",
            Self::ExploreDashboard => "Mark Complete",
        }
    }
}

impl std::fmt::Display for ChecklistStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Progress record as returned by the checklist API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistProgress {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub verify_email: bool,
    #[serde(default)]
    pub add_ssh_key: bool,
    #[serde(default)]
    pub create_vm: bool,
    #[serde(default)]
    pub configure_network: bool,
    #[serde(default)]
    pub attach_volume: bool,
    #[serde(default)]
    pub explore_dashboard: bool,
    /// Server-computed; never derived from the flags on this side
    #[serde(default)]
    pub completion_pct: u8,
    #[serde(default)]
    pub completed_steps: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ChecklistProgress {
    pub fn is_complete(&self, step: ChecklistStep) -> bool {
        match step {
            ChecklistStep::VerifyEmail => self.verify_email,
            ChecklistStep::AddSshKey => self.add_ssh_key,
            ChecklistStep::CreateVm => self.create_vm,
            ChecklistStep::ConfigureNetwork => self.configure_network,
            ChecklistStep::AttachVolume => self.attach_volume,
            ChecklistStep::ExploreDashboard => self.explore_dashboard,
        }
    }
}

/// Partial update sent to the checklist API. Unset flags are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_ssh_key: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_vm: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configure_network: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attach_volume: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explore_dashboard: Option<bool>,
}

impl ChecklistUpdate {
    /// Update that marks a single step complete
    pub fn mark(step: ChecklistStep) -> Self {
        let mut update = Self::default();
        let flag = match step {
            ChecklistStep::VerifyEmail => &mut update.verify_email,
            ChecklistStep::AddSshKey => &mut update.add_ssh_key,
            ChecklistStep::CreateVm => &mut update.create_vm,
            ChecklistStep::ConfigureNetwork => &mut update.configure_network,
            ChecklistStep::AttachVolume => &mut update.attach_volume,
            ChecklistStep::ExploreDashboard => &mut update.explore_dashboard,
        };
        *flag = Some(true);
        update
    }
}
