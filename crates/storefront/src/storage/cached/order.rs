//! Cached order repository decorator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use storefront_core::cache::{
    order_detail_key, order_user_key, order_user_pattern, Cache, CachePolicy,
};
use storefront_core::commerce::{Order, OrderStatus};
use storefront_core::storage::{OrderRepository, Result};

use crate::cache_aside::CacheAside;

/// Caches order details and each user's order listings.
///
/// Listings are keyed by status filter (`order-user:{user}:{status}` or
/// `:all`), so a status change drops all of them for the owning user.
pub struct CachedOrderRepository<R, C>
where
    R: OrderRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache_aside: Arc<CacheAside<C>>,
    policy: CachePolicy,
}

impl<R, C> CachedOrderRepository<R, C>
where
    R: OrderRepository,
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
impl<R, C> OrderRepository for CachedOrderRepository<R, C>
where
    R: OrderRepository + 'static,
    C: Cache + 'static,
{
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
        self.cache_aside
            .read_through(&order_detail_key(id), self.policy, || {
                self.repository.get_order(id)
            })
            .await
    }

    async fn list_orders_for_user(
        &self,
        user_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>> {
        let key = order_user_key(user_id, status.as_ref().map(OrderStatus::as_str));
        let listing = self
            .cache_aside
            .read_through(&key, self.policy, || async move {
                self.repository
                    .list_orders_for_user(user_id, status)
                    .await
                    .map(Some)
            })
            .await?;
        Ok(listing.unwrap_or_default())
    }

    async fn create_order(&self, order: &Order) -> Result<()> {
        self.cache_aside
            .write_aside(&order_detail_key(order.id), self.policy, || async move {
                self.repository
                    .create_order(order)
                    .await
                    .map(|()| order.clone())
            })
            .await?;
        self.cache_aside
            .invalidate_pattern(&order_user_pattern(order.user_id))
            .await;
        tracing::debug!(order_id = %order.id, user_id = %order.user_id, total = order.total_price, "Order created");
        Ok(())
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order> {
        let order = self
            .cache_aside
            .write_aside(&order_detail_key(id), self.policy, || {
                self.repository.update_order_status(id, status)
            })
            .await?;
        self.cache_aside
            .invalidate_pattern(&order_user_pattern(order.user_id))
            .await;
        tracing::debug!(order_id = %id, status = %order.status, "Order status updated");
        Ok(order)
    }
}
