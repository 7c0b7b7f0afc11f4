//! Cached user repository decorator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use storefront_core::cache::{user_detail_key, Cache, CachePolicy};
use storefront_core::commerce::User;
use storefront_core::storage::{Result, UserRepository};

use crate::cache_aside::CacheAside;

/// Caches single users under `user-detail:{id}`; listings are not cached.
pub struct CachedUserRepository<R, C>
where
    R: UserRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache_aside: Arc<CacheAside<C>>,
    policy: CachePolicy,
}

impl<R, C> CachedUserRepository<R, C>
where
    R: UserRepository,
    C: Cache,
{
    pub fn new(repository: Arc<R>, cache_aside: Arc<CacheAside<C>>, ttl: Duration) -> Self {
        Self {
            repository,
            cache_aside,
            policy: CachePolicy::update(ttl),
        }
    }
}

#[async_trait]
impl<R, C> UserRepository for CachedUserRepository<R, C>
where
    R: UserRepository + 'static,
    C: Cache + 'static,
{
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        self.cache_aside
            .read_through(&user_detail_key(id), self.policy, || {
                self.repository.get_user(id)
            })
            .await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.cache_aside
            .bounded_store(self.repository.list_users())
            .await
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        self.cache_aside
            .write_aside(&user_detail_key(user.id), self.policy, || async move {
                self.repository.create_user(user).await.map(|()| user.clone())
            })
            .await?;
        tracing::debug!(user_id = %user.id, "User created");
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        self.cache_aside
            .write_aside(&user_detail_key(user.id), self.policy, || async move {
                self.repository.update_user(user).await.map(|()| user.clone())
            })
            .await?;
        tracing::debug!(user_id = %user.id, "User updated");
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        self.cache_aside
            .write_aside(&user_detail_key(id), self.policy.invalidating(), || {
                self.repository.delete_user(id)
            })
            .await?;
        tracing::debug!(user_id = %id, "User deleted");
        Ok(())
    }
}
