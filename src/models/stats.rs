// ABOUTME: Dashboard statistics as returned by the stats API
// Every field is optional on the wire; consumers apply their own defaults

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeStats {
    #[serde(default)]
    pub total_vms: Option<u64>,
    #[serde(default)]
    pub running: Option<u64>,
    #[serde(default)]
    pub stopped: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStats {
    #[serde(default)]
    pub total_volumes: Option<u64>,
    #[serde(default)]
    pub attached: Option<u64>,
    #[serde(default)]
    pub detached: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkingStats {
    #[serde(default)]
    pub vpcs: Option<u64>,
    #[serde(default)]
    pub security_groups: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub billing_status: Option<String>,
    #[serde(default)]
    pub completion_pct: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub compute: Option<ComputeStats>,
    #[serde(default)]
    pub storage: Option<StorageStats>,
    #[serde(default)]
    pub networking: Option<NetworkingStats>,
    #[serde(default)]
    pub account: Option<AccountInfo>,
}
