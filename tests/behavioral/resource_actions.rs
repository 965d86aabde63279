// ABOUTME: Behavioral tests for per-resource actions under concurrent use
// Covers the single-action-per-resource rule, post-action refresh and optimistic delete

use std::sync::Arc;

use skydeck::api::ApiError;
use skydeck::lifecycle::{
    ActionError, ActionKind, ActionLockRegistry, ResourceActionCoordinator,
};
use skydeck::models::ResourceStatus;

use crate::fixtures::{FakeCloud, server};

async fn coordinator_over(cloud: &Arc<FakeCloud>) -> Arc<ResourceActionCoordinator> {
    let coordinator = Arc::new(ResourceActionCoordinator::new(cloud.clone()));
    coordinator.refresh().await.unwrap();
    coordinator
}

#[tokio::test]
async fn test_start_shows_progress_then_active() {
    let cloud = FakeCloud::with_servers(vec![server("vm-1", ResourceStatus::Stopped)]);
    let coordinator = coordinator_over(&cloud).await;
    let gate = cloud.gate("start", "vm-1");

    let task = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        async move { coordinator.start("vm-1").await }
    });
    gate.entered().await;

    let rows = coordinator.rows().await;
    let row = &rows[0];
    assert_eq!(row.busy, Some(ActionKind::Start));
    assert!(!row.can_start && !row.can_delete);

    gate.release();
    task.await.unwrap().unwrap();

    assert_eq!(coordinator.resources().await[0].status, ResourceStatus::Active);
    assert_eq!(coordinator.action_in_flight("vm-1"), None);
}

#[tokio::test]
async fn test_failed_start_refreshes_and_leaves_status() {
    let cloud = FakeCloud::with_servers(vec![server("vm-1", ResourceStatus::Stopped)]);
    let coordinator = coordinator_over(&cloud).await;
    cloud.fail("start", ApiError::status(500, Some("hypervisor error".to_string())));

    let err = coordinator.start("vm-1").await.unwrap_err();

    assert!(matches!(err, ActionError::Api { action: ActionKind::Start, .. }));
    assert_eq!(cloud.count("list"), 2);
    assert_eq!(coordinator.resources().await[0].status, ResourceStatus::Stopped);
    assert!(coordinator.locks().is_empty());
}

#[tokio::test]
async fn test_second_action_on_busy_resource_is_rejected() {
    let cloud = FakeCloud::with_servers(vec![server("vm-1", ResourceStatus::Active)]);
    let coordinator = coordinator_over(&cloud).await;
    let gate = cloud.gate("reboot", "vm-1");

    let task = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        async move { coordinator.reboot("vm-1").await }
    });
    gate.entered().await;

    let (stop, reboot, delete) = tokio::join!(
        coordinator.stop("vm-1"),
        coordinator.reboot("vm-1"),
        coordinator.delete("vm-1"),
    );
    let attempts = [stop, reboot, delete];
    gate.release();
    task.await.unwrap().unwrap();

    assert!(attempts
        .iter()
        .all(|r| matches!(r, Err(ActionError::Busy(busy)) if busy.held == ActionKind::Reboot)));
    assert_eq!(cloud.count("stop"), 0);
    assert_eq!(cloud.count("delete"), 0);
    assert_eq!(cloud.max_concurrent("vm-1"), 1);
}

#[tokio::test]
async fn test_actions_on_different_resources_complete_in_any_order() {
    let cloud = FakeCloud::with_servers(vec![
        server("vm-1", ResourceStatus::Stopped),
        server("vm-2", ResourceStatus::Active),
    ]);
    let coordinator = coordinator_over(&cloud).await;
    let gate_1 = cloud.gate("start", "vm-1");
    let gate_2 = cloud.gate("stop", "vm-2");

    let first = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        async move { coordinator.start("vm-1").await }
    });
    let second = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        async move { coordinator.stop("vm-2").await }
    });
    gate_1.entered().await;
    gate_2.entered().await;
    assert_eq!(coordinator.locks().len(), 2);

    gate_2.release();
    second.await.unwrap().unwrap();
    assert_eq!(coordinator.action_in_flight("vm-1"), Some(ActionKind::Start));
    assert_eq!(coordinator.action_in_flight("vm-2"), None);

    gate_1.release();
    first.await.unwrap().unwrap();

    let statuses: Vec<ResourceStatus> = coordinator
        .resources()
        .await
        .into_iter()
        .map(|r| r.status)
        .collect();
    assert_eq!(statuses, vec![ResourceStatus::Active, ResourceStatus::Stopped]);
}

#[tokio::test]
async fn test_lock_is_shared_between_views() {
    let cloud = FakeCloud::with_servers(vec![server("vm-1", ResourceStatus::Active)]);
    let locks = ActionLockRegistry::new();
    let list_view = Arc::new(ResourceActionCoordinator::with_locks(cloud.clone(), locks.clone()));
    let detail_view = ResourceActionCoordinator::with_locks(cloud.clone(), locks);
    let gate = cloud.gate("stop", "vm-1");

    let task = tokio::spawn({
        let list_view = Arc::clone(&list_view);
        async move { list_view.stop("vm-1").await }
    });
    gate.entered().await;

    assert!(detail_view.start("vm-1").await.unwrap_err().is_busy());
    gate.release();
    task.await.unwrap().unwrap();
    assert_eq!(cloud.max_concurrent("vm-1"), 1);
}

#[tokio::test]
async fn test_delete_removes_exactly_one_and_keeps_order() {
    let cloud = FakeCloud::with_servers(vec![
        server("a", ResourceStatus::Active),
        server("b", ResourceStatus::Stopped),
        server("c", ResourceStatus::Error),
        server("d", ResourceStatus::Active),
    ]);
    let coordinator = coordinator_over(&cloud).await;

    coordinator.delete("c").await.unwrap();

    let ids: Vec<String> = coordinator.resources().await.into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["a", "b", "d"]);
    assert_eq!(cloud.count("list"), 1);
}

#[tokio::test]
async fn test_failed_delete_keeps_resource() {
    let cloud = FakeCloud::with_servers(vec![server("a", ResourceStatus::Active)]);
    let coordinator = coordinator_over(&cloud).await;
    cloud.fail("delete", ApiError::Transport("connection reset".to_string()));

    assert!(coordinator.delete("a").await.is_err());
    assert_eq!(coordinator.resources().await.len(), 1);
}

#[tokio::test]
async fn test_detached_view_ignores_late_list() {
    let cloud = FakeCloud::with_servers(vec![server("a", ResourceStatus::Active)]);
    let coordinator = Arc::new(ResourceActionCoordinator::new(cloud.clone()));
    let gate = cloud.gate("list", "*");

    let task = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        async move { coordinator.refresh().await }
    });
    gate.entered().await;
    assert!(coordinator.is_loading().await);
    coordinator.detach_view();
    gate.release();
    task.await.unwrap().unwrap();

    assert!(coordinator.resources().await.is_empty());
    assert!(!coordinator.is_loading().await);
}

#[tokio::test]
async fn test_unconfigured_backend_lists_nothing() {
    let cloud = FakeCloud::with_servers(vec![server("a", ResourceStatus::Active)]);
    cloud.fail("list", ApiError::status(503, None));
    let coordinator = ResourceActionCoordinator::new(cloud.clone());

    coordinator.refresh().await.unwrap();
    assert!(coordinator.resources().await.is_empty());
    assert_eq!(coordinator.last_error().await, None);
}
