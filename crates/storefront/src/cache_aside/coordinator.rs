//! The cache-aside coordinator used by every cached repository.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::time::timeout;

use storefront_core::cache::{decode, encode, Cache, CacheError, CachePolicy, WritePolicy};
use storefront_core::storage::{Result as StoreResult, StoreError};

use super::generations::WriteGenerations;

/// Keys whose write generation is remembered.
const GENERATION_CAPACITY: usize = 10_000;

/// Applies read-through and write-aside against one cache and one store.
///
/// Cache failures never fail an operation: they are logged and treated as a
/// miss or a skipped cache step. Store failures always propagate.
pub struct CacheAside<C: Cache> {
    cache: Arc<C>,
    cache_timeout: Duration,
    store_timeout: Duration,
    generations: WriteGenerations,
}

impl<C: Cache> CacheAside<C> {
    pub fn new(cache: Arc<C>, cache_timeout: Duration, store_timeout: Duration) -> Self {
        Self {
            cache,
            cache_timeout,
            store_timeout,
            generations: WriteGenerations::new(GENERATION_CAPACITY),
        }
    }

    /// Returns the cached value for `key`, or fetches it from the store and
    /// populates the cache.
    ///
    /// `Ok(None)` (not found) is never cached. A value fetched while a
    /// concurrent write touched `key` is returned but not cached.
    pub async fn read_through<T, F, Fut>(
        &self,
        key: &str,
        policy: CachePolicy,
        fetch: F,
    ) -> StoreResult<Option<T>>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = StoreResult<Option<T>>> + Send,
    {
        if let Some(bytes) = self.cache_get(key).await {
            match decode::<T>(&bytes) {
                Ok(value) => {
                    tracing::trace!(key, "Cache hit");
                    return Ok(Some(value));
                }
                Err(err) => {
                    tracing::warn!(key, error = %err, "Cached value unreadable, treating as miss");
                }
            }
        } else {
            tracing::trace!(key, "Cache miss");
        }

        let seen = self.generations.snapshot(key);
        let fetched = self.bounded_store(fetch()).await?;

        if let Some(value) = &fetched {
            let _guard = self.generations.lock(key).await;
            if self.generations.is_current(key, seen) {
                self.cache_set(key, value, policy.ttl).await;
            } else {
                tracing::debug!(key, "Key written during fetch, not populating cache");
            }
        }

        Ok(fetched)
    }

    /// Runs a store mutation, then applies the policy's cache step to `key`.
    ///
    /// If the mutation fails the cache is not touched at all.
    pub async fn write_aside<T, F, Fut>(
        &self,
        key: &str,
        policy: CachePolicy,
        mutate: F,
    ) -> StoreResult<T>
    where
        T: Serialize + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = StoreResult<T>> + Send,
    {
        let value = self.bounded_store(mutate()).await?;

        let _guard = self.generations.lock(key).await;
        self.generations.bump(key);
        match policy.write {
            WritePolicy::Update => self.cache_set(key, &value, policy.ttl).await,
            WritePolicy::Invalidate => self.cache_delete(key).await,
        }
        Ok(value)
    }

    /// Runs a store mutation, then deletes every key matching `pattern`.
    pub async fn write_invalidating<T, F, Fut>(&self, pattern: &str, mutate: F) -> StoreResult<T>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = StoreResult<T>> + Send,
    {
        let value = self.bounded_store(mutate()).await?;
        self.invalidate_pattern(pattern).await;
        Ok(value)
    }

    /// Deletes every key matching `pattern` after a committed mutation.
    pub async fn invalidate_pattern(&self, pattern: &str) {
        let _guards = self.generations.lock_all().await;
        self.generations.bump_pattern(pattern);
        let result = self
            .guard_cache(self.cache.delete_pattern(pattern))
            .await;
        if let Err(err) = result {
            tracing::warn!(pattern, error = %err, "Cache pattern invalidation failed");
        }
    }

    /// Runs a store operation under the store timeout.
    pub async fn bounded_store<T, Fut>(&self, operation: Fut) -> StoreResult<T>
    where
        Fut: Future<Output = StoreResult<T>>,
    {
        match timeout(self.store_timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.store_timeout.as_millis() as u64)),
        }
    }

    async fn guard_cache<T, Fut>(&self, operation: Fut) -> Result<T, CacheError>
    where
        Fut: Future<Output = Result<T, CacheError>>,
    {
        match timeout(self.cache_timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.cache_timeout.as_millis() as u64)),
        }
    }

    async fn cache_get(&self, key: &str) -> Option<Vec<u8>> {
        match self.guard_cache(self.cache.get(key)).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "Cache read failed, falling back to store");
                None
            }
        }
    }

    async fn cache_set<T: Serialize + Sync>(&self, key: &str, value: &T, ttl: Duration) {
        let bytes = match encode(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(key, error = %err, "Failed to encode value for cache");
                return;
            }
        };
        if let Err(err) = self.guard_cache(self.cache.set(key, &bytes, Some(ttl))).await {
            tracing::warn!(key, error = %err, "Cache write failed");
        }
    }

    async fn cache_delete(&self, key: &str) {
        if let Err(err) = self.guard_cache(self.cache.delete(key)).await {
            tracing::warn!(key, error = %err, "Cache invalidation failed");
        }
    }
}
