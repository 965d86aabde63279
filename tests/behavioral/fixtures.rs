// ABOUTME: In-memory cloud backend for behavioral tests
//
// Provides:
// - FakeCloud: implements the provisioning, checklist and stats APIs over shared state
// - Gate: parks a call mid-flight so tests can observe and reorder interleavings
// - Failure injection per operation name

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use skydeck::api::{ApiError, ApiResult, ChecklistApi, ProvisioningApi, StatsApi};
use skydeck::models::{
    ChecklistProgress, ChecklistStep, ChecklistUpdate, CloudFlavor, CloudImage, CloudNetwork,
    ComputeStats, CreateServerPayload, DashboardStats, ProvisionableResource, ResourceStatus,
};

/// Holds a call until the test releases it
#[derive(Default)]
pub struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    /// Wait until the gated call has started
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the gated call finish
    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[derive(Default)]
pub struct FakeCloud {
    servers: Mutex<Vec<ProvisionableResource>>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashMap<String, ApiError>>,
    gates: Mutex<HashMap<String, Arc<Gate>>>,
    active: Mutex<HashMap<String, usize>>,
    max_active: Mutex<HashMap<String, usize>>,
    checklist: Mutex<ChecklistProgress>,
    networks: Mutex<Vec<CloudNetwork>>,
    payloads: Mutex<Vec<CreateServerPayload>>,
    next_id: AtomicUsize,
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap()
}

impl FakeCloud {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_servers(servers: Vec<ProvisionableResource>) -> Arc<Self> {
        let cloud = Self::default();
        *lock(&cloud.servers) = servers;
        Arc::new(cloud)
    }

    pub fn add_network(&self, id: &str, name: &str) {
        lock(&self.networks).push(CloudNetwork {
            id: id.to_string(),
            name: name.to_string(),
        });
    }

    /// Make every later `op` call fail with `error`
    pub fn fail(&self, op: &str, error: ApiError) {
        lock(&self.failing).insert(op.to_string(), error);
    }

    pub fn recover(&self, op: &str) {
        lock(&self.failing).remove(op);
    }

    /// Park the next `op` call on `target` until released
    pub fn gate(&self, op: &str, target: &str) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        lock(&self.gates).insert(format!("{op}:{target}"), Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn count(&self, op: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| c.split(':').next() == Some(op))
            .count()
    }

    /// Highest number of overlapping mutating calls seen for `resource_id`
    pub fn max_concurrent(&self, resource_id: &str) -> usize {
        lock(&self.max_active).get(resource_id).copied().unwrap_or(0)
    }

    pub fn servers(&self) -> Vec<ProvisionableResource> {
        lock(&self.servers).clone()
    }

    /// Every payload the create call accepted or rejected, in order
    pub fn payloads(&self) -> Vec<CreateServerPayload> {
        lock(&self.payloads).clone()
    }

    pub fn checklist_state(&self) -> ChecklistProgress {
        lock(&self.checklist).clone()
    }

    async fn enter(&self, op: &str, target: &str) -> ApiResult<()> {
        lock(&self.calls).push(format!("{op}:{target}"));
        let gate = lock(&self.gates).remove(&format!("{op}:{target}"));
        if let Some(gate) = gate {
            gate.pass().await;
        }
        match lock(&self.failing).get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn mutate(
        &self,
        op: &str,
        id: &str,
        apply: impl FnOnce(&mut Vec<ProvisionableResource>),
    ) -> ApiResult<()> {
        {
            let mut active = lock(&self.active);
            let count = active.entry(id.to_string()).or_default();
            *count += 1;
            let mut max = lock(&self.max_active);
            let seen = max.entry(id.to_string()).or_default();
            *seen = (*seen).max(*count);
        }

        let result = self.enter(op, id).await;
        if result.is_ok() {
            apply(&mut lock(&self.servers));
        }

        if let Some(count) = lock(&self.active).get_mut(id) {
            *count -= 1;
        }
        result
    }

    fn set_status(servers: &mut [ProvisionableResource], id: &str, status: ResourceStatus) {
        if let Some(server) = servers.iter_mut().find(|s| s.id == id) {
            server.status = status;
        }
    }
}

#[async_trait]
impl ProvisioningApi for FakeCloud {
    async fn list_images(&self) -> ApiResult<Vec<CloudImage>> {
        self.enter("images", "*").await?;
        Ok(Vec::new())
    }

    async fn list_flavors(&self) -> ApiResult<Vec<CloudFlavor>> {
        self.enter("flavors", "*").await?;
        Ok(Vec::new())
    }

    async fn list_networks(&self) -> ApiResult<Vec<CloudNetwork>> {
        self.enter("networks", "*").await?;
        Ok(lock(&self.networks).clone())
    }

    async fn create(&self, payload: &CreateServerPayload) -> ApiResult<ProvisionableResource> {
        lock(&self.payloads).push(payload.clone());
        self.enter("create", &payload.name).await?;
        let id = format!("srv-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let server = ProvisionableResource::new(id, payload.name.clone(), ResourceStatus::Building);
        lock(&self.servers).push(server.clone());
        Ok(server)
    }

    async fn list(&self) -> ApiResult<Vec<ProvisionableResource>> {
        self.enter("list", "*").await?;
        Ok(self.servers())
    }

    async fn start(&self, id: &str) -> ApiResult<()> {
        self.mutate("start", id, |s| Self::set_status(s, id, ResourceStatus::Active))
            .await
    }

    async fn stop(&self, id: &str) -> ApiResult<()> {
        self.mutate("stop", id, |s| Self::set_status(s, id, ResourceStatus::Stopped))
            .await
    }

    async fn reboot(&self, id: &str) -> ApiResult<()> {
        self.mutate("reboot", id, |s| Self::set_status(s, id, ResourceStatus::Active))
            .await
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        self.mutate("delete", id, |s| s.retain(|server| server.id != id))
            .await
    }
}

#[async_trait]
impl ChecklistApi for FakeCloud {
    async fn get_checklist(&self) -> ApiResult<ChecklistProgress> {
        self.enter("get_checklist", "*").await?;
        Ok(self.checklist_state())
    }

    async fn update_checklist(&self, update: &ChecklistUpdate) -> ApiResult<ChecklistProgress> {
        self.enter("update_checklist", "*").await?;
        let mut guard = lock(&self.checklist);
        let progress = &mut *guard;
        let flags = [
            (update.verify_email, &mut progress.verify_email),
            (update.add_ssh_key, &mut progress.add_ssh_key),
            (update.create_vm, &mut progress.create_vm),
            (update.configure_network, &mut progress.configure_network),
            (update.attach_volume, &mut progress.attach_volume),
            (update.explore_dashboard, &mut progress.explore_dashboard),
        ];
        for (value, flag) in flags {
            if let Some(value) = value {
                *flag = value;
            }
        }

        let done: Vec<String> = ChecklistStep::all()
            .iter()
            .filter(|step| progress.is_complete(**step))
            .map(|step| step.key().to_string())
            .collect();
        progress.completion_pct = u8::try_from(done.len() * 100 / 6).unwrap_or(100);
        progress.completed_steps = done;
        Ok(progress.clone())
    }
}

#[async_trait]
impl StatsApi for FakeCloud {
    async fn get_stats(&self) -> ApiResult<DashboardStats> {
        self.enter("stats", "*").await?;
        let servers = self.servers();
        let count = |f: fn(&ResourceStatus) -> bool| {
            servers.iter().filter(|s| f(&s.status)).count() as u64
        };
        Ok(DashboardStats {
            compute: Some(ComputeStats {
                total_vms: Some(servers.len() as u64),
                running: Some(count(ResourceStatus::is_running)),
                stopped: Some(count(ResourceStatus::is_stopped)),
            }),
            ..Default::default()
        })
    }
}

pub fn server(id: &str, status: ResourceStatus) -> ProvisionableResource {
    ProvisionableResource::new(id, format!("{id}-name"), status)
}
