use std::sync::Arc;
use std::time::Duration;

use storefront_core::registry::ServiceDescriptor;
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};
use uuid::Uuid;

use super::ServiceRegistry;

/// Evicts expired instances every `interval` until `shutdown` flips to true.
pub fn spawn_sweeper(
    registry: Arc<ServiceRegistry>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let evicted = registry.sweep().await;
                    if !evicted.is_empty() {
                        tracing::debug!(count = evicted.len(), "Sweep evicted instances");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("Sweeper stopped");
    })
}

/// Keeps the gateway's own registry entry alive.
///
/// Registers `descriptor` in-process, refreshes it every `interval`, and
/// registers again if the entry was evicted. Unregisters on shutdown.
pub fn spawn_self_registration(
    registry: Arc<ServiceRegistry>,
    descriptor: ServiceDescriptor,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut service_id = register(&registry, &descriptor).await;
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let alive = match service_id {
                        Some(id) => registry.heartbeat(id).await,
                        None => false,
                    };
                    if !alive {
                        service_id = register(&registry, &descriptor).await;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        if let Some(id) = service_id {
            registry.unregister(id).await;
        }
    })
}

async fn register(registry: &ServiceRegistry, descriptor: &ServiceDescriptor) -> Option<Uuid> {
    match registry.register(descriptor.clone()).await {
        Ok(instance) => Some(instance.service_id),
        Err(e) => {
            tracing::error!(error = %e, "Gateway self-registration rejected");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::registry::SelectionPolicy;

    #[tokio::test]
    async fn test_sweeper_evicts_and_stops() {
        let registry = Arc::new(ServiceRegistry::new(
            Duration::from_millis(30),
            SelectionPolicy::RoundRobin,
        ));
        registry
            .register(ServiceDescriptor::new("order_service", "localhost", 4000))
            .await
            .unwrap();
        let (tx, rx) = watch::channel(false);

        let handle = spawn_sweeper(registry.clone(), Duration::from_millis(20), rx);
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(registry.snapshot(true).await.is_empty());
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_self_registration_lifecycle() {
        let registry = Arc::new(ServiceRegistry::new(
            Duration::from_secs(90),
            SelectionPolicy::RoundRobin,
        ));
        let descriptor = ServiceDescriptor::new("api-gateway", "localhost", 5555)
            .with_endpoints(["/api/user/*"]);
        let (tx, rx) = watch::channel(false);

        let handle =
            spawn_self_registration(registry.clone(), descriptor, Duration::from_millis(20), rx);
        tokio::time::sleep(Duration::from_millis(80)).await;

        let gateway = registry.resolve("api-gateway").await.unwrap();
        assert_eq!(gateway.port, 5555);

        tx.send(true).unwrap();
        handle.await.unwrap();
        assert!(registry.resolve("api-gateway").await.is_none());
    }
}
