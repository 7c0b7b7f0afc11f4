//! Gateway registration agent.
//!
//! A service process registers itself with the gateway at start-up, keeps
//! its registry entry alive with periodic heartbeats, and unregisters on
//! shutdown. When the gateway answers a heartbeat with `success: false`
//! (the entry expired or the gateway restarted) the agent registers again
//! under a new service ID.

use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use reqwest::Client;
use storefront_core::registry::{
    HeartbeatResponse, RegisterResponse, ServiceDescriptor, UnregisterResponse,
};
use tokio::{sync::watch, task::JoinHandle};
use url::Url;
use uuid::Uuid;

use crate::config::{Config, ServiceKind};

/// Upper bound on a single call to the gateway.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the gateway's registry endpoints.
#[derive(Clone)]
pub struct RegistrationAgent {
    client: Client,
    gateway: Url,
    descriptor: ServiceDescriptor,
    interval: Duration,
}

impl RegistrationAgent {
    pub fn new(gateway_url: &str, descriptor: ServiceDescriptor, interval: Duration) -> Result<Self> {
        let gateway = Url::parse(gateway_url)
            .with_context(|| format!("Invalid gateway URL: {gateway_url}"))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            gateway,
            descriptor,
            interval,
        })
    }

    /// Agent for `service` listening on `port`, configured from `config`.
    pub fn from_config(config: &Config, service: ServiceKind, port: u16) -> Result<Self> {
        let descriptor = ServiceDescriptor::new(
            service.service_name(),
            config.advertised_host.clone(),
            port,
        )
        .with_endpoints(service.endpoints());
        Self::new(&config.gateway_url, descriptor, config.heartbeat_interval())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.gateway
            .join(path)
            .with_context(|| format!("Invalid gateway path: {path}"))
    }

    /// Registers this process and returns the assigned service ID.
    pub async fn register(&self) -> Result<Uuid> {
        let response: RegisterResponse = self
            .client
            .post(self.endpoint("/register")?)
            .json(&self.descriptor)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if !response.success {
            anyhow::bail!("Gateway rejected registration");
        }
        tracing::info!(
            service_id = %response.service_id,
            service = ?self.descriptor.name,
            gateway = %self.gateway,
            "Registered with gateway"
        );
        Ok(response.service_id)
    }

    /// Refreshes the registry entry. `false` means the gateway no longer knows it.
    pub async fn heartbeat(&self, service_id: Uuid) -> Result<bool> {
        let response: HeartbeatResponse = self
            .client
            .post(self.endpoint(&format!("/heartbeat/{service_id}"))?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.success)
    }

    pub async fn unregister(&self, service_id: Uuid) -> Result<bool> {
        let response: UnregisterResponse = self
            .client
            .post(self.endpoint(&format!("/unregister/{service_id}"))?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.success)
    }

    /// Delay before the next heartbeat: the interval plus up to 10% jitter.
    fn next_delay(&self) -> Duration {
        let max_jitter = (self.interval.as_millis() / 10) as u64;
        let jitter = if max_jitter == 0 {
            0
        } else {
            rand::rng().random_range(0..=max_jitter)
        };
        self.interval + Duration::from_millis(jitter)
    }

    /// One heartbeat step. Returns the service ID to use from now on.
    async fn keep_alive(&self, current: Option<Uuid>) -> Option<Uuid> {
        let Some(service_id) = current else {
            return match self.register().await {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::warn!(error = %e, "Registration failed, will retry");
                    None
                }
            };
        };

        match self.heartbeat(service_id).await {
            Ok(true) => {
                tracing::trace!(service_id = %service_id, "Heartbeat acknowledged");
                Some(service_id)
            }
            Ok(false) => {
                tracing::info!(service_id = %service_id, "Gateway forgot this instance, re-registering");
                match self.register().await {
                    Ok(id) => Some(id),
                    Err(e) => {
                        tracing::warn!(error = %e, "Re-registration failed, will retry");
                        None
                    }
                }
            }
            Err(e) => {
                // The gateway may be briefly unreachable; keep the ID and try again.
                tracing::warn!(service_id = %service_id, error = %e, "Heartbeat failed");
                Some(service_id)
            }
        }
    }

    /// Registers, heartbeats until `shutdown` flips to true, then unregisters.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut service_id = self.keep_alive(None).await;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.next_delay()) => {
                    service_id = self.keep_alive(service_id).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        if let Some(id) = service_id {
            match self.unregister(id).await {
                Ok(removed) => {
                    tracing::info!(service_id = %id, removed, "Unregistered from gateway")
                }
                Err(e) => tracing::warn!(service_id = %id, error = %e, "Unregister failed"),
            }
        }
    }

    /// Runs the agent on a background task.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
