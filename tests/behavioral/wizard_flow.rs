// ABOUTME: Behavioral tests for the provisioning wizard end to end
// Runs the wizard against the in-memory backend together with the dashboard views

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use skydeck::api::ApiError;
use skydeck::lifecycle::{
    BACKEND_UNAVAILABLE_MESSAGE, ChecklistSynchronizer, DashboardRefresh, ResourceActionCoordinator,
    StatsAggregator, WizardController, WizardError, WizardPhase, WizardStep,
};
use skydeck::models::{CatalogSource, ChecklistStep, ResourceStatus};

use crate::fixtures::FakeCloud;

struct Console {
    cloud: Arc<FakeCloud>,
    dashboard: DashboardRefresh,
    wizard: Arc<WizardController>,
}

fn console() -> Console {
    let cloud = FakeCloud::new();
    let dashboard = DashboardRefresh::new(
        Arc::new(ResourceActionCoordinator::new(cloud.clone())),
        Arc::new(ChecklistSynchronizer::new(cloud.clone())),
        Arc::new(StatsAggregator::new(cloud.clone())),
    );
    let wizard = WizardController::new(cloud.clone())
        .with_checklist(Arc::clone(dashboard.checklist()))
        .with_success_delay(Duration::ZERO);
    Console {
        cloud,
        dashboard,
        wizard: Arc::new(wizard),
    }
}

async fn fill(wizard: &WizardController, name: &str) {
    wizard.load_options().await;
    wizard.select_image("ubuntu-22").unwrap();
    wizard.next().unwrap();
    wizard.select_flavor("medium").unwrap();
    wizard.next().unwrap();
    wizard.set_name(name).unwrap();
}

#[tokio::test]
async fn test_create_refreshes_every_view() {
    let console = console();
    fill(&console.wizard, "web-server-01").await;

    let dashboard = console.dashboard.clone();
    let created = console
        .wizard
        .submit(|| async move {
            dashboard.refresh_all().await;
        })
        .await
        .unwrap();

    assert_eq!(created.status, ResourceStatus::Building);
    let payloads = console.cloud.payloads();
    let payload = &payloads[0];
    assert_eq!(payload.name, "web-server-01");
    assert_eq!(payload.network_id, None);
    assert!(!payload.wait);

    let resources = console.dashboard.coordinator().resources().await;
    assert_eq!(resources.len(), 1);
    assert_eq!(console.dashboard.stats().overview().await.total_vms, 1);
    assert!(console.dashboard.checklist().is_complete(ChecklistStep::CreateVm).await);
    assert_eq!(console.dashboard.checklist().percentage().await, 16);
    assert_eq!(console.wizard.step(), WizardStep::ChooseImage);
}

#[tokio::test]
async fn test_catalog_failures_fall_back_independently() {
    let console = console();
    console.cloud.fail("images", ApiError::status(503, None));
    console.cloud.add_network("net-1", "private");

    let catalogs = console.wizard.load_options().await;
    assert_eq!(catalogs.images.len(), 4);
    assert_eq!(catalogs.flavors.len(), 4);
    assert_eq!(catalogs.networks_source, CatalogSource::Live);

    console.wizard.load_options().await;
    assert_eq!(console.cloud.count("images"), 1);
}

#[tokio::test]
async fn test_selected_network_and_key_are_sent_trimmed() {
    let console = console();
    console.cloud.add_network("net-1", "private");
    fill(&console.wizard, "  db-01 ").await;
    console.wizard.select_network(Some("net-1")).unwrap();
    console.wizard.set_key_name(" ops-key ").unwrap();

    console.wizard.submit(|| async {}).await.unwrap();

    let payloads = console.cloud.payloads();
    let payload = &payloads[0];
    assert_eq!(payload.name, "db-01");
    assert_eq!(payload.network_id.as_deref(), Some("net-1"));
    assert_eq!(payload.key_name.as_deref(), Some("ops-key"));
}

#[tokio::test]
async fn test_failed_create_leaves_checklist_untouched() {
    let console = console();
    console
        .cloud
        .fail("create", ApiError::status(400, Some("Quota exceeded".to_string())));
    fill(&console.wizard, "web-server-01").await;

    let err = console.wizard.submit(|| async {}).await.unwrap_err();

    assert!(matches!(err, WizardError::CreateFailed { .. }));
    assert_eq!(console.wizard.error().as_deref(), Some("Quota exceeded"));
    assert_eq!(console.wizard.step(), WizardStep::NetworkAndName);
    assert_eq!(console.cloud.count("update_checklist"), 0);
    assert!(!console.cloud.checklist_state().create_vm);
}

#[tokio::test]
async fn test_unconfigured_backend_message_then_retry() {
    let console = console();
    console.cloud.fail(
        "create",
        ApiError::status(400, Some("Cloud provider not configured".to_string())),
    );
    fill(&console.wizard, "web-server-01").await;

    assert!(console.wizard.submit(|| async {}).await.is_err());
    assert_eq!(console.wizard.error().as_deref(), Some(BACKEND_UNAVAILABLE_MESSAGE));

    console.cloud.recover("create");
    console.wizard.submit(|| async {}).await.unwrap();
    assert_eq!(console.cloud.servers().len(), 1);
}

#[tokio::test]
async fn test_checklist_failure_does_not_fail_create() {
    let console = console();
    console
        .cloud
        .fail("update_checklist", ApiError::status(500, None));
    fill(&console.wizard, "web-server-01").await;
    let completed = AtomicBool::new(false);

    let result = console
        .wizard
        .submit(|| async {
            completed.store(true, Ordering::SeqCst);
        })
        .await;

    assert!(result.is_ok());
    assert!(completed.load(Ordering::SeqCst));
    assert_eq!(console.cloud.count("get_checklist"), 1);
}

#[tokio::test]
async fn test_close_during_submit_skips_completion() {
    let console = console();
    fill(&console.wizard, "web-server-01").await;
    let gate = console.cloud.gate("create", "web-server-01");
    let completed = Arc::new(AtomicBool::new(false));

    let task = tokio::spawn({
        let wizard = Arc::clone(&console.wizard);
        let completed = Arc::clone(&completed);
        async move {
            wizard
                .submit(|| async move {
                    completed.store(true, Ordering::SeqCst);
                })
                .await
        }
    });
    gate.entered().await;
    assert_eq!(console.wizard.phase(), WizardPhase::Submitting);

    console.wizard.close();
    gate.release();
    assert!(task.await.unwrap().is_ok());

    assert!(!completed.load(Ordering::SeqCst));
    assert_eq!(console.wizard.phase(), WizardPhase::Cancelled);
    assert!(console.cloud.checklist_state().create_vm);
}

#[tokio::test]
async fn test_double_submit_is_rejected() {
    let console = console();
    fill(&console.wizard, "web-server-01").await;
    let gate = console.cloud.gate("create", "web-server-01");

    let task = tokio::spawn({
        let wizard = Arc::clone(&console.wizard);
        async move { wizard.submit(|| async {}).await }
    });
    gate.entered().await;

    let second = console.wizard.submit(|| async {}).await;
    assert!(matches!(second, Err(WizardError::InvalidPhase { .. })));

    gate.release();
    task.await.unwrap().unwrap();
    assert_eq!(console.cloud.count("create"), 1);
}
