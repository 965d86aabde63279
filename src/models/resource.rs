// ABOUTME: Provisionable resource model (virtual machines, containers) and its status vocabulary
// Status parsing is total: anything the backend sends maps to a known variant or Unrecognized

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status reported by the provisioning backend.
///
/// The wire vocabulary follows OpenStack (`BUILD`, `SHUTOFF`, ...); the spelled-out
/// aliases (`BUILDING`, `STOPPED`, `REBOOTING`) are accepted on input as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "String")]
pub enum ResourceStatus {
    #[default]
    Building,
    Active,
    Stopped,
    Rebooting,
    HardRebooting,
    Paused,
    Suspended,
    Error,
    Deleted,
    Unrecognized(String),
}

/// Visual tone used by list views to colour a status chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Success,
    Warning,
    Neutral,
    Accent,
    Danger,
    Muted,
}

/// Presentation of a status: a label and a tone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusStyle {
    pub label: String,
    pub tone: StatusTone,
}

impl ResourceStatus {
    /// Parse a wire status. Never fails.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BUILD" | "BUILDING" => Self::Building,
            "ACTIVE" | "RUNNING" => Self::Active,
            "SHUTOFF" | "STOPPED" => Self::Stopped,
            "REBOOT" | "REBOOTING" => Self::Rebooting,
            "HARD_REBOOT" => Self::HardRebooting,
            "PAUSED" => Self::Paused,
            "SUSPENDED" => Self::Suspended,
            "ERROR" => Self::Error,
            "DELETED" => Self::Deleted,
            _ => Self::Unrecognized(raw.to_string()),
        }
    }

    /// Wire representation, as the backend spells it
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Building => "BUILD",
            Self::Active => "ACTIVE",
            Self::Stopped => "SHUTOFF",
            Self::Rebooting => "REBOOT",
            Self::HardRebooting => "HARD_REBOOT",
            Self::Paused => "PAUSED",
            Self::Suspended => "SUSPENDED",
            Self::Error => "ERROR",
            Self::Deleted => "DELETED",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Status → presentation mapping. Total over every value, including unknown ones.
    pub fn style(&self) -> StatusStyle {
        let (label, tone) = match self {
            Self::Active => ("Running", StatusTone::Success),
            Self::Building => ("Building", StatusTone::Warning),
            Self::Rebooting | Self::HardRebooting => ("Rebooting", StatusTone::Warning),
            Self::Stopped => ("Stopped", StatusTone::Neutral),
            Self::Paused => ("Paused", StatusTone::Accent),
            Self::Suspended => ("Suspended", StatusTone::Accent),
            Self::Error => ("Error", StatusTone::Danger),
            Self::Deleted => ("Deleted", StatusTone::Muted),
            Self::Unrecognized(raw) => {
                return StatusStyle {
                    label: raw.clone(),
                    tone: StatusTone::Muted,
                };
            }
        };
        StatusStyle {
            label: label.to_string(),
            tone,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}

/// Null reads as `Building`; a non-string value is kept as its JSON text
impl<'de> Deserialize<'de> for ResourceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
            None => Self::default(),
            Some(serde_json::Value::String(raw)) => Self::from_wire(&raw),
            Some(other) => Self::Unrecognized(other.to_string()),
        })
    }
}

impl From<String> for ResourceStatus {
    fn from(raw: String) -> Self {
        Self::from_wire(&raw)
    }
}

impl From<ResourceStatus> for String {
    fn from(status: ResourceStatus) -> Self {
        status.as_wire().to_string()
    }
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Flavor reference embedded in a resource descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A compute unit tracked by the console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionableResource {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: ResourceStatus,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub flavor: Option<FlavorRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProvisionableResource {
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: ResourceStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            ip_address: None,
            flavor: None,
            created_at: None,
        }
    }

    pub fn ip_display(&self) -> &str {
        self.ip_address.as_deref().unwrap_or("—")
    }

    /// Flavor name, falling back to its id
    pub fn flavor_display(&self) -> &str {
        self.flavor
            .as_ref()
            .and_then(|f| f.name.as_deref().or(f.id.as_deref()))
            .unwrap_or("—")
    }

    pub fn created_display(&self) -> String {
        self.created_at
            .map(|ts| ts.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| "—".to_string())
    }
}

/// Body of the create call. Optional fields are omitted, never sent empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateServerPayload {
    pub name: String,
    pub image_id: String,
    pub flavor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    #[serde(default)]
    pub wait: bool,
}
