//! Cached product repository decorator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use storefront_core::cache::{
    product_count_key, product_detail_key, product_list_all_key, product_list_key,
    product_list_pattern, product_search_key, Cache, CachePolicy,
};
use storefront_core::commerce::Product;
use storefront_core::storage::{PriceRange, ProductRepository, ProductSearch, Result};

use crate::cache_aside::CacheAside;

/// Caches product details and every catalog query.
///
/// Listings, price searches and counts all live under `product-list:*`.
/// A product mutation may move the product between any of them, so the
/// whole family is dropped on every mutation.
pub struct CachedProductRepository<R, C>
where
    R: ProductRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache_aside: Arc<CacheAside<C>>,
    policy: CachePolicy,
}

impl<R, C> CachedProductRepository<R, C>
where
    R: ProductRepository,
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
impl<R, C> ProductRepository for CachedProductRepository<R, C>
where
    R: ProductRepository + 'static,
    C: Cache + 'static,
{
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        self.cache_aside
            .read_through(&product_detail_key(id), self.policy, || {
                self.repository.get_product(id)
            })
            .await
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let listing = self
            .cache_aside
            .read_through(&product_list_all_key(), self.policy, || async move {
                self.repository.list_products().await.map(Some)
            })
            .await?;
        Ok(listing.unwrap_or_default())
    }

    async fn list_products_by_type(&self, product_type: &str) -> Result<Vec<Product>> {
        let listing = self
            .cache_aside
            .read_through(&product_list_key(product_type), self.policy, || async move {
                self.repository
                    .list_products_by_type(product_type)
                    .await
                    .map(Some)
            })
            .await?;
        Ok(listing.unwrap_or_default())
    }

    async fn search_products(&self, search: &ProductSearch) -> Result<Vec<Product>> {
        let page = self
            .cache_aside
            .read_through(&product_search_key(search), self.policy, || async move {
                self.repository.search_products(search).await.map(Some)
            })
            .await?;
        Ok(page.unwrap_or_default())
    }

    async fn count_products(&self, range: &PriceRange) -> Result<u64> {
        let count = self
            .cache_aside
            .read_through(&product_count_key(range), self.policy, || async move {
                self.repository.count_products(range).await.map(Some)
            })
            .await?;
        Ok(count.unwrap_or_default())
    }

    async fn create_product(&self, product: &Product) -> Result<()> {
        self.cache_aside
            .write_aside(&product_detail_key(product.id), self.policy, || async move {
                self.repository
                    .create_product(product)
                    .await
                    .map(|()| product.clone())
            })
            .await?;
        self.cache_aside
            .invalidate_pattern(&product_list_pattern())
            .await;
        tracing::debug!(product_id = %product.id, product_type = %product.product_type, "Product created");
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        self.cache_aside
            .write_aside(&product_detail_key(product.id), self.policy, || async move {
                self.repository
                    .update_product(product)
                    .await
                    .map(|()| product.clone())
            })
            .await?;
        self.cache_aside
            .invalidate_pattern(&product_list_pattern())
            .await;
        tracing::debug!(product_id = %product.id, "Product updated");
        Ok(())
    }

    async fn delete_product(&self, id: Uuid) -> Result<()> {
        self.cache_aside
            .write_aside(&product_detail_key(id), self.policy.invalidating(), || {
                self.repository.delete_product(id)
            })
            .await?;
        self.cache_aside
            .invalidate_pattern(&product_list_pattern())
            .await;
        tracing::debug!(product_id = %id, "Product deleted");
        Ok(())
    }
}
