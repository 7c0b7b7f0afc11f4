//! In-memory service registry.
//!
//! One async `RwLock` guards the whole table, so register, heartbeat,
//! unregister and sweep are atomic with respect to each other. Lookups
//! filter on liveness at call time and never depend on a sweep having run.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use storefront_core::registry::{
    expired_ids, instance_state, is_live, select_index, InstanceState, Result,
    SelectionPolicy, ServiceDescriptor, ServiceInstance,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Clock, SystemClock};

/// Instances of one service name plus its round-robin cursor.
#[derive(Default)]
struct ServiceGroup {
    instances: HashMap<Uuid, ServiceInstance>,
    cursor: AtomicUsize,
}

impl ServiceGroup {
    /// Live instances, oldest registration first.
    fn live(&self, now: chrono::DateTime<chrono::Utc>, window: Duration) -> Vec<&ServiceInstance> {
        let mut live: Vec<&ServiceInstance> = self
            .instances
            .values()
            .filter(|instance| is_live(instance, now, window))
            .collect();
        live.sort_by(|a, b| {
            a.registered_at
                .cmp(&b.registered_at)
                .then(a.service_id.cmp(&b.service_id))
        });
        live
    }
}

#[derive(Default)]
struct Table {
    services: HashMap<String, ServiceGroup>,
    /// service_id -> service name
    owners: HashMap<Uuid, String>,
}

impl Table {
    fn remove(&mut self, service_id: Uuid) -> Option<ServiceInstance> {
        let name = self.owners.remove(&service_id)?;
        let group = self.services.get_mut(&name)?;
        let removed = group.instances.remove(&service_id);
        if group.instances.is_empty() {
            self.services.remove(&name);
        }
        removed
    }
}

/// An instance as listed by the admin endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceView {
    #[serde(flatten)]
    pub instance: ServiceInstance,
    pub state: InstanceState,
}

/// Tracks live backend instances per service name.
pub struct ServiceRegistry {
    table: RwLock<Table>,
    window: Duration,
    policy: SelectionPolicy,
    clock: Arc<dyn Clock>,
}

impl ServiceRegistry {
    pub fn new(window: Duration, policy: SelectionPolicy) -> Self {
        Self::with_clock(window, policy, Arc::new(SystemClock))
    }

    pub fn with_clock(window: Duration, policy: SelectionPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            table: RwLock::new(Table::default()),
            window,
            policy,
            clock,
        }
    }

    /// Validates the descriptor and adds a new instance under a fresh ID.
    pub async fn register(&self, descriptor: ServiceDescriptor) -> Result<ServiceInstance> {
        let now = self.clock.now();
        let instance = ServiceInstance::from_descriptor(descriptor, Uuid::new_v4(), now)?;

        let mut table = self.table.write().await;
        table
            .owners
            .insert(instance.service_id, instance.name.clone());
        table
            .services
            .entry(instance.name.clone())
            .or_default()
            .instances
            .insert(instance.service_id, instance.clone());

        tracing::info!(
            service_id = %instance.service_id,
            name = %instance.name,
            address = %instance.base_url(),
            "Service registered"
        );
        Ok(instance)
    }

    /// Refreshes an instance's heartbeat.
    ///
    /// Returns `false` for unknown IDs. An instance already past the liveness
    /// window is evicted instead of revived, and `false` is returned so the
    /// caller registers again.
    pub async fn heartbeat(&self, service_id: Uuid) -> bool {
        let now = self.clock.now();
        let mut table = self.table.write().await;

        let Some(name) = table.owners.get(&service_id).cloned() else {
            tracing::debug!(service_id = %service_id, "Heartbeat for unknown instance");
            return false;
        };
        let live = table
            .services
            .get(&name)
            .and_then(|group| group.instances.get(&service_id))
            .map(|instance| is_live(instance, now, self.window));

        match live {
            Some(true) => {
                if let Some(instance) = table
                    .services
                    .get_mut(&name)
                    .and_then(|group| group.instances.get_mut(&service_id))
                {
                    instance.last_heartbeat_at = now;
                }
                tracing::trace!(service_id = %service_id, "Heartbeat");
                true
            }
            Some(false) => {
                table.remove(service_id);
                tracing::info!(service_id = %service_id, name = %name, "Evicted expired instance on heartbeat");
                false
            }
            None => {
                table.owners.remove(&service_id);
                false
            }
        }
    }

    /// Removes an instance. Returns `false` if it was not registered.
    pub async fn unregister(&self, service_id: Uuid) -> bool {
        let removed = self.table.write().await.remove(service_id);
        match removed {
            Some(instance) => {
                tracing::info!(service_id = %service_id, name = %instance.name, "Service unregistered");
                true
            }
            None => false,
        }
    }

    /// One live instance of `name`, chosen by the selection policy.
    pub async fn resolve(&self, name: &str) -> Option<ServiceInstance> {
        let now = self.clock.now();
        let table = self.table.read().await;
        let group = table.services.get(name)?;
        let live = group.live(now, self.window);
        let ticket = match self.policy {
            SelectionPolicy::RoundRobin => group.cursor.fetch_add(1, Ordering::Relaxed),
            SelectionPolicy::FirstMatch => 0,
        };
        let index = select_index(self.policy, live.len(), ticket)?;
        live.get(index).map(|instance| (*instance).clone())
    }

    /// Every live instance of `name`, oldest registration first.
    pub async fn resolve_all(&self, name: &str) -> Vec<ServiceInstance> {
        let now = self.clock.now();
        let table = self.table.read().await;
        table
            .services
            .get(name)
            .map(|group| group.live(now, self.window).into_iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Evicts every expired instance and returns their IDs.
    pub async fn sweep(&self) -> Vec<Uuid> {
        let now = self.clock.now();
        let mut table = self.table.write().await;
        let expired = expired_ids(
            table.services.values().flat_map(|g| g.instances.values()),
            now,
            self.window,
        );
        for service_id in &expired {
            if let Some(instance) = table.remove(*service_id) {
                tracing::info!(service_id = %service_id, name = %instance.name, "Swept expired instance");
            }
        }
        expired
    }

    /// All instances grouped by name, optionally including expired ones.
    pub async fn snapshot(&self, include_expired: bool) -> BTreeMap<String, Vec<InstanceView>> {
        let now = self.clock.now();
        let table = self.table.read().await;
        let mut snapshot = BTreeMap::new();
        for (name, group) in &table.services {
            let mut views: Vec<InstanceView> = group
                .instances
                .values()
                .map(|instance| InstanceView {
                    instance: instance.clone(),
                    state: instance_state(instance, now, self.window),
                })
                .filter(|view| include_expired || view.state == InstanceState::Active)
                .collect();
            if views.is_empty() {
                continue;
            }
            views.sort_by(|a, b| a.instance.registered_at.cmp(&b.instance.registered_at));
            snapshot.insert(name.clone(), views);
        }
        snapshot
    }
}
