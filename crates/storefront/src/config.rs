use std::{env, fmt, str::FromStr, time::Duration};

/// Which API a service process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ServiceKind {
    User,
    Product,
    Cart,
    Order,
}

impl ServiceKind {
    /// Name the process registers under with the gateway.
    pub fn service_name(&self) -> &'static str {
        match self {
            ServiceKind::User => "user_service",
            ServiceKind::Product => "product_service",
            ServiceKind::Cart => "cart_service",
            ServiceKind::Order => "order_service",
        }
    }

    /// Public path prefix, as in `/api/{prefix}/...`.
    pub fn path_prefix(&self) -> &'static str {
        match self {
            ServiceKind::User => "user",
            ServiceKind::Product => "product",
            ServiceKind::Cart => "cart",
            ServiceKind::Order => "order",
        }
    }

    /// Endpoint patterns advertised at registration.
    pub fn endpoints(&self) -> Vec<String> {
        vec![format!("/api/{}/*", self.path_prefix())]
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_prefix())
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds (default: 3600)
    pub cache_ttl_seconds: u64,
    /// Maximum number of in-memory cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Upper bound on a single cache call (default: 250)
    pub cache_timeout_ms: u64,
    /// Upper bound on a single store call (default: 5000)
    pub store_timeout_ms: u64,
    /// Path to the SQLite database file shared by all instances
    /// (default: "storefront.db"). Only used when the `sqlite` feature is enabled.
    #[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379").
    /// Only used when the `redis` feature is enabled.
    #[cfg_attr(not(feature = "redis"), allow(dead_code))]
    pub redis_url: String,
    /// Gateway base URL; registration is skipped when empty.
    pub gateway_url: String,
    /// Seconds between heartbeats (default: 30)
    pub heartbeat_interval_seconds: u64,
    /// Host the gateway should use to reach this process (default: "localhost")
    pub advertised_host: String,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS`, `CACHE_MAX_ENTRIES`, `CACHE_TIMEOUT_MS`,
    ///   `STORE_TIMEOUT_MS`, `SQLITE_PATH`, `REDIS_URL`
    /// - `GATEWAY_URL` (default: "http://localhost:5555")
    /// - `HEARTBEAT_INTERVAL_SECONDS` (default: 30)
    /// - `ADVERTISED_HOST` (default: "localhost")
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: env_or("CACHE_TTL_SECONDS", 3600),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", 10_000),
            cache_timeout_ms: env_or("CACHE_TIMEOUT_MS", 250),
            store_timeout_ms: env_or("STORE_TIMEOUT_MS", 5000),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "storefront.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            gateway_url: env::var("GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:5555".to_string()),
            heartbeat_interval_seconds: env_or("HEARTBEAT_INTERVAL_SECONDS", 30),
            advertised_host: env::var("ADVERTISED_HOST")
                .ok()
                .filter(|h| !h.trim().is_empty())
                .unwrap_or_else(|| "localhost".to_string()),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_seconds.max(1))
    }

    /// Whether this process should register with a gateway at all.
    pub fn registration_enabled(&self) -> bool {
        !self.gateway_url.trim().is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 3600,
            cache_max_entries: 10_000,
            cache_timeout_ms: 250,
            store_timeout_ms: 5000,
            sqlite_path: "storefront.db".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            gateway_url: "http://localhost:5555".to_string(),
            heartbeat_interval_seconds: 30,
            advertised_host: "localhost".to_string(),
        }
    }
}
