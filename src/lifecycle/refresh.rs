// ABOUTME: Fan-out refresh of the dashboard views after a lifecycle event
// Each view refreshes independently; one failing never holds back the others

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::checklist_sync::ChecklistSynchronizer;
use super::coordinator::ResourceActionCoordinator;
use super::stats::StatsAggregator;

/// Which views refreshed successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub resources: bool,
    pub checklist: bool,
    pub stats: bool,
}

impl RefreshReport {
    pub fn all_ok(&self) -> bool {
        self.resources && self.checklist && self.stats
    }
}

#[derive(Clone)]
pub struct DashboardRefresh {
    coordinator: Arc<ResourceActionCoordinator>,
    checklist: Arc<ChecklistSynchronizer>,
    stats: Arc<StatsAggregator>,
}

impl DashboardRefresh {
    pub fn new(
        coordinator: Arc<ResourceActionCoordinator>,
        checklist: Arc<ChecklistSynchronizer>,
        stats: Arc<StatsAggregator>,
    ) -> Self {
        Self {
            coordinator,
            checklist,
            stats,
        }
    }

    pub fn coordinator(&self) -> &Arc<ResourceActionCoordinator> {
        &self.coordinator
    }

    pub fn checklist(&self) -> &Arc<ChecklistSynchronizer> {
        &self.checklist
    }

    pub fn stats(&self) -> &Arc<StatsAggregator> {
        &self.stats
    }

    /// Refresh the resource list, the checklist and the stats concurrently
    pub async fn refresh_all(&self) -> RefreshReport {
        let (resources, checklist, stats) = tokio::join!(
            self.coordinator.refresh(),
            self.checklist.refresh(),
            self.stats.refresh(),
        );

        let report = RefreshReport {
            resources: resources.is_ok(),
            checklist: checklist.is_ok(),
            stats: stats.is_ok(),
        };
        debug!(?report, "Dashboard refreshed");
        report
    }
}
