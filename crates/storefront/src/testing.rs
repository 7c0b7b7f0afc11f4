//! Test doubles shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use storefront_core::cache::{pattern_matches, Cache, CacheError, Result as CacheResult};
use storefront_core::commerce::{Cart, CartItem, Order, OrderStatus, Product, User};
use storefront_core::storage::{
    CartChange, CartRepository, OrderRepository, PriceRange, ProductRepository, ProductSearch,
    Result, StoreError, UserRepository,
};

use crate::storage::InMemoryRepository;

/// HashMap-backed cache that records TTLs and counts writes.
#[derive(Default)]
pub struct MockCache {
    store: RwLock<HashMap<String, (Vec<u8>, Option<Duration>)>>,
    writes: AtomicUsize,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.store.read().await.contains_key(key)
    }

    pub async fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.store.read().await.get(key).and_then(|(_, ttl)| *ttl)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Cache for MockCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.store.read().await.get(key).map(|(v, _)| v.clone()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.store
            .write()
            .await
            .insert(key.to_string(), (value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.store.write().await.remove(key);
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> CacheResult<()> {
        self.store
            .write()
            .await
            .retain(|key, _| !pattern_matches(pattern, key));
        Ok(())
    }
}

/// A cache that is always unreachable.
pub struct FailingCache;

fn offline() -> CacheError {
    CacheError::ConnectionFailed("cache offline".to_string())
}

#[async_trait]
impl Cache for FailingCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
        Err(offline())
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> CacheResult<()> {
        Err(offline())
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(offline())
    }

    async fn delete_pattern(&self, _pattern: &str) -> CacheResult<()> {
        Err(offline())
    }
}

/// In-memory store that counts reads and can be told to reject writes.
#[derive(Default)]
pub struct CountingRepository {
    inner: InMemoryRepository,
    reads: AtomicUsize,
    fail_writes: AtomicBool,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Direct access to the store, bypassing counters and failure injection.
    pub fn inner(&self) -> &InMemoryRepository {
        &self.inner
    }

    fn read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }

    fn write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::QueryFailed("write rejected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for CountingRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        self.read();
        self.inner.get_user(id).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.read();
        self.inner.list_users().await
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        self.write()?;
        self.inner.create_user(user).await
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        self.write()?;
        self.inner.update_user(user).await
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        self.write()?;
        self.inner.delete_user(id).await
    }
}

#[async_trait]
impl ProductRepository for CountingRepository {
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        self.read();
        self.inner.get_product(id).await
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        self.read();
        self.inner.list_products().await
    }

    async fn list_products_by_type(&self, product_type: &str) -> Result<Vec<Product>> {
        self.read();
        self.inner.list_products_by_type(product_type).await
    }

    async fn search_products(&self, search: &ProductSearch) -> Result<Vec<Product>> {
        self.read();
        self.inner.search_products(search).await
    }

    async fn count_products(&self, range: &PriceRange) -> Result<u64> {
        self.read();
        self.inner.count_products(range).await
    }

    async fn create_product(&self, product: &Product) -> Result<()> {
        self.write()?;
        self.inner.create_product(product).await
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        self.write()?;
        self.inner.update_product(product).await
    }

    async fn delete_product(&self, id: Uuid) -> Result<()> {
        self.write()?;
        self.inner.delete_product(id).await
    }
}

#[async_trait]
impl CartRepository for CountingRepository {
    async fn get_cart(&self, user_id: Uuid) -> Result<Option<Cart>> {
        self.read();
        self.inner.get_cart(user_id).await
    }

    async fn add_item(&self, user_id: Uuid, item: CartItem) -> Result<Cart> {
        self.write()?;
        self.inner.add_item(user_id, item).await
    }

    async fn update_item_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<Cart> {
        self.write()?;
        self.inner
            .update_item_quantity(user_id, product_id, quantity)
            .await
    }

    async fn remove_item(&self, item_id: Uuid) -> Result<CartChange> {
        self.write()?;
        self.inner.remove_item(item_id).await
    }

    async fn remove_items(&self, item_ids: &[Uuid]) -> Result<Vec<CartChange>> {
        self.write()?;
        self.inner.remove_items(item_ids).await
    }
}

#[async_trait]
impl OrderRepository for CountingRepository {
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
        self.read();
        self.inner.get_order(id).await
    }

    async fn list_orders_for_user(
        &self,
        user_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>> {
        self.read();
        self.inner.list_orders_for_user(user_id, status).await
    }

    async fn create_order(&self, order: &Order) -> Result<()> {
        self.write()?;
        self.inner.create_order(order).await
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order> {
        self.write()?;
        self.inner.update_order_status(id, status).await
    }
}
