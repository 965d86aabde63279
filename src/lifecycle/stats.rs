// ABOUTME: Read-only aggregation of dashboard statistics into overview cards
// Missing counts read as zero and missing strings as "—"

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::{ApiError, StatsApi};
use crate::models::DashboardStats;

/// Placeholder for an absent string value
pub const MISSING_VALUE: &str = "—";

/// Flattened dashboard counts with every default applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedStats {
    pub total_vms: u64,
    pub running: u64,
    pub stopped: u64,
    pub total_volumes: u64,
    pub attached: u64,
    pub detached: u64,
    pub vpcs: u64,
    pub security_groups: u64,
    pub role: String,
    pub billing_status: String,
    pub onboarding_pct: u8,
}

impl AggregatedStats {
    pub fn from_stats(stats: &DashboardStats) -> Self {
        let compute = stats.compute.clone().unwrap_or_default();
        let storage = stats.storage.clone().unwrap_or_default();
        let networking = stats.networking.clone().unwrap_or_default();
        let account = stats.account.clone().unwrap_or_default();

        Self {
            total_vms: compute.total_vms.unwrap_or(0),
            running: compute.running.unwrap_or(0),
            stopped: compute.stopped.unwrap_or(0),
            total_volumes: storage.total_volumes.unwrap_or(0),
            attached: storage.attached.unwrap_or(0),
            detached: storage.detached.unwrap_or(0),
            vpcs: networking.vpcs.unwrap_or(0),
            security_groups: networking.security_groups.unwrap_or(0),
            role: non_blank(account.role),
            billing_status: non_blank(account.billing_status),
            onboarding_pct: account.completion_pct.unwrap_or(0),
        }
    }

    /// Compute, Storage, Networking and Account cards in display order
    pub fn cards(&self) -> Vec<StatCard> {
        vec![
            StatCard::new(
                "Compute",
                [
                    ("Total VMs", self.total_vms.to_string()),
                    ("Running", self.running.to_string()),
                    ("Stopped", self.stopped.to_string()),
                ],
            ),
            StatCard::new(
                "Storage",
                [
                    ("Total Volumes", self.total_volumes.to_string()),
                    ("Attached", self.attached.to_string()),
                    ("Detached", self.detached.to_string()),
                ],
            ),
            StatCard::new(
                "Networking",
                [
                    ("VPCs", self.vpcs.to_string()),
                    ("Security Groups", self.security_groups.to_string()),
                ],
            ),
            StatCard::new(
                "Account",
                [
                    ("Role", self.role.clone()),
                    ("Billing Status", self.billing_status.clone()),
                    ("Onboarding", format!("{}% done", self.onboarding_pct)),
                ],
            ),
        ]
    }
}

impl Default for AggregatedStats {
    fn default() -> Self {
        Self::from_stats(&DashboardStats::default())
    }
}

fn non_blank(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| MISSING_VALUE.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub entries: Vec<(&'static str, String)>,
}

impl StatCard {
    fn new<const N: usize>(title: &'static str, entries: [(&'static str, String); N]) -> Self {
        Self {
            title,
            entries: entries.into(),
        }
    }
}

pub struct StatsAggregator {
    api: Arc<dyn StatsApi>,
    snapshot: RwLock<AggregatedStats>,
}

impl StatsAggregator {
    pub fn new(api: Arc<dyn StatsApi>) -> Self {
        Self {
            api,
            snapshot: RwLock::new(AggregatedStats::default()),
        }
    }

    /// Fetch and aggregate. A failure keeps the previous snapshot.
    pub async fn refresh(&self) -> Result<AggregatedStats, ApiError> {
        match self.api.get_stats().await {
            Ok(stats) => {
                let aggregated = AggregatedStats::from_stats(&stats);
                debug!(total_vms = aggregated.total_vms, "Dashboard stats refreshed");
                *self.snapshot.write().await = aggregated.clone();
                Ok(aggregated)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load dashboard stats");
                Err(e)
            }
        }
    }

    pub async fn overview(&self) -> AggregatedStats {
        self.snapshot.read().await.clone()
    }

    pub async fn cards(&self) -> Vec<StatCard> {
        self.snapshot.read().await.cards()
    }
}
