//! Application state shared by every request handler.
//!
//! Repositories are trait objects: each one is a cached decorator wrapping
//! the document store. The store and cache backends are chosen at compile
//! time via feature flags.

use std::sync::Arc;

use storefront_core::cache::Cache;
use storefront_core::storage::{
    CartRepository, OrderRepository, ProductRepository, UserRepository,
};

use crate::cache_aside::CacheAside;
use crate::config::{Config, ServiceKind};
use crate::storage::{
    CachedCartRepository, CachedOrderRepository, CachedProductRepository, CachedUserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The API this process serves.
    pub service: ServiceKind,
    pub users: Arc<dyn UserRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl AppState {
    /// Wires the cached repositories over one store and one cache.
    pub fn with_cache<S, C>(
        service: ServiceKind,
        store: Arc<S>,
        cache: Arc<C>,
        config: &Config,
    ) -> Self
    where
        S: UserRepository + ProductRepository + CartRepository + OrderRepository + 'static,
        C: Cache + 'static,
    {
        let cache_aside = Arc::new(CacheAside::new(
            cache,
            config.cache_timeout(),
            config.store_timeout(),
        ));
        let ttl = config.cache_ttl();

        Self {
            service,
            users: Arc::new(CachedUserRepository::new(
                store.clone(),
                cache_aside.clone(),
                ttl,
            )),
            products: Arc::new(CachedProductRepository::new(
                store.clone(),
                cache_aside.clone(),
                ttl,
            )),
            carts: Arc::new(CachedCartRepository::new(
                store.clone(),
                cache_aside.clone(),
                ttl,
            )),
            orders: Arc::new(CachedOrderRepository::new(store, cache_aside, ttl)),
        }
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates state with a per-process store and LRU cache.
        pub async fn new(service: ServiceKind, config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(InMemoryRepository::new());
            let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
            tracing::info!(
                max_entries = config.cache_max_entries,
                "Using in-memory store and in-memory cache"
            );
            Ok(Self::with_cache(service, store, cache, config))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates state with a per-process store and the shared Redis cache.
        pub async fn new(service: ServiceKind, config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(InMemoryRepository::new());
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);
            tracing::info!(url = %config.redis_url, "Using in-memory store and Redis cache");
            tracing::warn!(
                "The in-memory store is private to this process; run a single instance \
                 per service or build with the 'sqlite' feature"
            );
            Ok(Self::with_cache(service, store, cache, config))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates state with the shared SQLite store and a per-process LRU cache.
        pub async fn new(service: ServiceKind, config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
            tracing::info!(
                path = %config.sqlite_path,
                max_entries = config.cache_max_entries,
                "Using SQLite store and in-memory cache"
            );
            Ok(Self::with_cache(service, store, cache, config))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates state with the shared SQLite store and the shared Redis cache.
        pub async fn new(service: ServiceKind, config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);
            tracing::info!(
                path = %config.sqlite_path,
                url = %config.redis_url,
                "Using SQLite store and Redis cache"
            );
            Ok(Self::with_cache(service, store, cache, config))
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State over a fresh store and an isolated mock cache.
    pub fn for_tests(service: ServiceKind) -> Self {
        Self::with_cache(
            service,
            Arc::new(crate::storage::InMemoryRepository::new()),
            Arc::new(crate::testing::MockCache::new()),
            &Config::default(),
        )
    }
}
