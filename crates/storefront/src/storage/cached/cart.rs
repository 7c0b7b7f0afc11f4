//! Cached cart repository decorator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use storefront_core::cache::{cart_count_key, cart_items_key, cart_pattern, Cache, CachePolicy};
use storefront_core::commerce::{Cart, CartItem};
use storefront_core::storage::{CartChange, CartRepository, Result};

use crate::cache_aside::CacheAside;

/// Caches a user's cart document and item count.
///
/// Any item mutation drops every `cart:{user}:*` key; cached carts are never
/// patched in place.
pub struct CachedCartRepository<R, C>
where
    R: CartRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache_aside: Arc<CacheAside<C>>,
    policy: CachePolicy,
}

impl<R, C> CachedCartRepository<R, C>
where
    R: CartRepository,
    C: Cache,
{
    pub fn new(repository: Arc<R>, cache_aside: Arc<CacheAside<C>>, ttl: Duration) -> Self {
        Self {
            repository,
            cache_aside,
            policy: CachePolicy::invalidate(ttl),
        }
    }

    async fn invalidate_changes(&self, changes: &[CartChange]) {
        for change in changes {
            self.cache_aside
                .invalidate_pattern(&cart_pattern(change.user_id))
                .await;
        }
    }
}

#[async_trait]
impl<R, C> CartRepository for CachedCartRepository<R, C>
where
    R: CartRepository + 'static,
    C: Cache + 'static,
{
    async fn get_cart(&self, user_id: Uuid) -> Result<Option<Cart>> {
        self.cache_aside
            .read_through(&cart_items_key(user_id), self.policy, || {
                self.repository.get_cart(user_id)
            })
            .await
    }

    async fn count_items(&self, user_id: Uuid) -> Result<usize> {
        let count = self
            .cache_aside
            .read_through(&cart_count_key(user_id), self.policy, || async move {
                self.repository.count_items(user_id).await.map(Some)
            })
            .await?;
        Ok(count.unwrap_or_default())
    }

    async fn add_item(&self, user_id: Uuid, item: CartItem) -> Result<Cart> {
        let product_id = item.product_id;
        let cart = self
            .cache_aside
            .write_invalidating(&cart_pattern(user_id), || {
                self.repository.add_item(user_id, item)
            })
            .await?;
        tracing::debug!(user_id = %user_id, product_id = %product_id, "Cart item added");
        Ok(cart)
    }

    async fn update_item_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<Cart> {
        self.cache_aside
            .write_invalidating(&cart_pattern(user_id), || {
                self.repository
                    .update_item_quantity(user_id, product_id, quantity)
            })
            .await
    }

    async fn remove_item(&self, item_id: Uuid) -> Result<CartChange> {
        // The owning user is only known once the store answers.
        let change = self
            .cache_aside
            .bounded_store(self.repository.remove_item(item_id))
            .await?;
        self.invalidate_changes(std::slice::from_ref(&change)).await;
        tracing::debug!(user_id = %change.user_id, item_id = %item_id, deleted_cart = change.was_deleted(), "Cart item removed");
        Ok(change)
    }

    async fn remove_items(&self, item_ids: &[Uuid]) -> Result<Vec<CartChange>> {
        let changes = self
            .cache_aside
            .bounded_store(self.repository.remove_items(item_ids))
            .await?;
        self.invalidate_changes(&changes).await;
        Ok(changes)
    }
}
