// ABOUTME: Behavioral tests for the checklist and stats views
// The views refresh independently and show exactly what the backend last reported

use std::sync::Arc;

use skydeck::api::ApiError;
use skydeck::lifecycle::{
    ChecklistError, ChecklistSynchronizer, DashboardRefresh, ResourceActionCoordinator,
    StatsAggregator,
};
use skydeck::models::{ChecklistStep, ResourceStatus};

use crate::fixtures::{FakeCloud, server};

fn dashboard(cloud: &Arc<FakeCloud>) -> DashboardRefresh {
    DashboardRefresh::new(
        Arc::new(ResourceActionCoordinator::new(cloud.clone())),
        Arc::new(ChecklistSynchronizer::new(cloud.clone())),
        Arc::new(StatsAggregator::new(cloud.clone())),
    )
}

#[tokio::test]
async fn test_percentage_tracks_backend() {
    let cloud = FakeCloud::new();
    let sync = ChecklistSynchronizer::new(cloud.clone());

    sync.refresh().await.unwrap();
    assert_eq!(sync.percentage().await, 0);

    sync.mark_complete(ChecklistStep::AddSshKey).await.unwrap();
    assert_eq!(sync.percentage().await, cloud.checklist_state().completion_pct);

    sync.mark_complete(ChecklistStep::VerifyEmail).await.unwrap();
    assert_eq!(sync.percentage().await, 33);
    assert_eq!(
        sync.progress().await.unwrap().completed_steps,
        vec!["verify_email", "add_ssh_key"]
    );
}

#[tokio::test]
async fn test_mark_while_pending_is_ignored() {
    let cloud = FakeCloud::new();
    let sync = Arc::new(ChecklistSynchronizer::new(cloud.clone()));
    let gate = cloud.gate("update_checklist", "*");

    let task = tokio::spawn({
        let sync = Arc::clone(&sync);
        async move { sync.mark_complete(ChecklistStep::AttachVolume).await }
    });
    gate.entered().await;

    let second = sync.mark_complete(ChecklistStep::ConfigureNetwork).await;
    assert!(matches!(second, Err(ChecklistError::Busy(ChecklistStep::AttachVolume))));

    gate.release();
    task.await.unwrap().unwrap();
    assert_eq!(cloud.count("update_checklist"), 1);
    assert_eq!(sync.marking(), None);
}

#[tokio::test]
async fn test_aborted_mark_releases_pending_step() {
    let cloud = FakeCloud::new();
    let sync = Arc::new(ChecklistSynchronizer::new(cloud.clone()));
    let gate = cloud.gate("update_checklist", "*");

    let task = tokio::spawn({
        let sync = Arc::clone(&sync);
        async move { sync.mark_complete(ChecklistStep::AttachVolume).await }
    });
    gate.entered().await;
    assert_eq!(sync.marking(), Some(ChecklistStep::AttachVolume));

    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    assert_eq!(sync.marking(), None);
    sync.mark_complete(ChecklistStep::ConfigureNetwork).await.unwrap();
    assert!(sync.is_complete(ChecklistStep::ConfigureNetwork).await);
}

#[tokio::test]
async fn test_failed_mark_keeps_last_percentage() {
    let cloud = FakeCloud::new();
    let sync = ChecklistSynchronizer::new(cloud.clone());
    sync.mark(ChecklistStep::CreateVm).await.unwrap();
    let before = sync.percentage().await;

    cloud.fail("update_checklist", ApiError::status(500, None));
    assert!(sync.mark(ChecklistStep::AttachVolume).await.is_err());

    assert_eq!(sync.percentage().await, before);
    assert_eq!(cloud.count("get_checklist"), 2);
}

#[tokio::test]
async fn test_refresh_all_survives_one_failing_view() {
    let cloud = FakeCloud::with_servers(vec![
        server("a", ResourceStatus::Active),
        server("b", ResourceStatus::Stopped),
        server("c", ResourceStatus::Active),
    ]);
    cloud.fail("get_checklist", ApiError::Transport("timeout".to_string()));
    let dashboard = dashboard(&cloud);

    let report = dashboard.refresh_all().await;

    assert!(report.resources && report.stats && !report.checklist);
    let stats = dashboard.stats().overview().await;
    assert_eq!((stats.total_vms, stats.running, stats.stopped), (3, 2, 1));
    assert_eq!(stats.role, "—");
}

#[tokio::test]
async fn test_stats_failure_keeps_previous_cards() {
    let cloud = FakeCloud::with_servers(vec![server("a", ResourceStatus::Active)]);
    let stats = StatsAggregator::new(cloud.clone());
    stats.refresh().await.unwrap();

    cloud.fail("stats", ApiError::status(502, None));
    assert!(stats.refresh().await.is_err());

    let cards = stats.cards().await;
    assert_eq!(cards[0].entries[0], ("Total VMs", "1".to_string()));
}
