use std::{env, str::FromStr, time::Duration};

use storefront_core::dispatch::{RetryPolicy, RouteTable};
use storefront_core::registry::SelectionPolicy;

/// Gateway configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Seconds services wait between heartbeats (default: 30)
    pub heartbeat_interval_seconds: u64,
    /// Seconds without a heartbeat before an instance stops being routable
    /// (default: 3x the heartbeat interval)
    pub liveness_window_seconds: u64,
    /// Seconds between background sweeps (default: 15)
    pub sweep_interval_seconds: u64,
    /// Upper bound on one forwarded request (default: 10000)
    pub forward_timeout_ms: u64,
    pub selection_policy: SelectionPolicy,
    pub routes: RouteTable,
    pub retry: RetryPolicy,
    /// Host other processes use to reach the gateway (default: "localhost")
    pub advertised_host: String,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `HEARTBEAT_INTERVAL_SECONDS` (default: 30)
    /// - `LIVENESS_WINDOW_SECONDS` (default: 3x heartbeat interval)
    /// - `SWEEP_INTERVAL_SECONDS` (default: 15)
    /// - `FORWARD_TIMEOUT_MS` (default: 10000)
    /// - `SELECTION_POLICY`: `round_robin` (default) or `first_match`
    /// - `ROUTES`: `prefix=service` pairs, e.g. `user=user_service,cart=cart_service`
    /// - `MAX_RETRIES` (default: 1)
    /// - `ADVERTISED_HOST` (default: "localhost")
    ///
    /// Unparseable policy or route values fall back to the defaults with a warning.
    pub fn from_env() -> Self {
        let heartbeat_interval_seconds = env_or("HEARTBEAT_INTERVAL_SECONDS", 30u64).max(1);

        let selection_policy = match env::var("SELECTION_POLICY") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to round_robin");
                SelectionPolicy::default()
            }),
            Err(_) => SelectionPolicy::default(),
        };

        let routes = match env::var("ROUTES") {
            Ok(value) => RouteTable::parse(&value).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default routes");
                RouteTable::default()
            }),
            Err(_) => RouteTable::default(),
        };

        Self {
            heartbeat_interval_seconds,
            liveness_window_seconds: env_or(
                "LIVENESS_WINDOW_SECONDS",
                heartbeat_interval_seconds * 3,
            ),
            sweep_interval_seconds: env_or("SWEEP_INTERVAL_SECONDS", 15),
            forward_timeout_ms: env_or("FORWARD_TIMEOUT_MS", 10_000),
            selection_policy,
            routes,
            retry: RetryPolicy {
                max_retries: env_or("MAX_RETRIES", 1),
            },
            advertised_host: env::var("ADVERTISED_HOST")
                .ok()
                .filter(|h| !h.trim().is_empty())
                .unwrap_or_else(|| "localhost".to_string()),
        }
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_seconds.max(1))
    }

    pub fn liveness_window(&self) -> Duration {
        Duration::from_secs(self.liveness_window_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }

    pub fn forward_timeout(&self) -> Duration {
        Duration::from_millis(self.forward_timeout_ms)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_seconds: 30,
            liveness_window_seconds: 90,
            sweep_interval_seconds: 15,
            forward_timeout_ms: 10_000,
            selection_policy: SelectionPolicy::default(),
            routes: RouteTable::default(),
            retry: RetryPolicy::default(),
            advertised_host: "localhost".to_string(),
        }
    }
}
