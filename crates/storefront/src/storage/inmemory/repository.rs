//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use storefront_core::commerce::{
    add_cart_item, remove_cart_item, remove_cart_items, set_cart_item_quantity,
    validate_status_transition, Cart, CartItem, Order, OrderStatus, Product, User,
};
use storefront_core::storage::{
    CartChange, CartRepository, OrderRepository, PriceRange, ProductRepository, ProductSearch,
    Result, StoreError, UserRepository,
};

/// In-memory storage backend.
///
/// Carts are keyed by owning user, which enforces one cart per user.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
    carts: Arc<RwLock<HashMap<Uuid, Cart>>>,
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(entity_type: &'static str, id: Uuid) -> StoreError {
    StoreError::NotFound {
        entity_type,
        id: id.to_string(),
    }
}

fn already_exists(entity_type: &'static str, id: Uuid) -> StoreError {
    StoreError::AlreadyExists {
        entity_type,
        id: id.to_string(),
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let mut list: Vec<User> = users.values().cloned().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(list)
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(already_exists("User", user.id));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(not_found("User", user.id));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let mut users = self.users.write().await;
        if users.remove(&id).is_none() {
            return Err(not_found("User", id));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryRepository {
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        let mut list: Vec<Product> = products.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    async fn list_products_by_type(&self, product_type: &str) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        let mut list: Vec<Product> = products
            .values()
            .filter(|p| p.product_type.eq_ignore_ascii_case(product_type))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    async fn search_products(&self, search: &ProductSearch) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        Ok(search.apply(products.values().cloned()))
    }

    async fn count_products(&self, range: &PriceRange) -> Result<u64> {
        let products = self.products.read().await;
        Ok(products.values().filter(|p| range.contains(p.price)).count() as u64)
    }

    async fn create_product(&self, product: &Product) -> Result<()> {
        let mut products = self.products.write().await;
        if products.contains_key(&product.id) {
            return Err(already_exists("Product", product.id));
        }
        products.insert(product.id, product.clone());
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        let mut products = self.products.write().await;
        if !products.contains_key(&product.id) {
            return Err(not_found("Product", product.id));
        }
        products.insert(product.id, product.clone());
        Ok(())
    }

    async fn delete_product(&self, id: Uuid) -> Result<()> {
        let mut products = self.products.write().await;
        if products.remove(&id).is_none() {
            return Err(not_found("Product", id));
        }
        Ok(())
    }
}

#[async_trait]
impl CartRepository for InMemoryRepository {
    async fn get_cart(&self, user_id: Uuid) -> Result<Option<Cart>> {
        let carts = self.carts.read().await;
        Ok(carts.get(&user_id).cloned())
    }

    async fn add_item(&self, user_id: Uuid, item: CartItem) -> Result<Cart> {
        let mut carts = self.carts.write().await;
        let mut cart = carts
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| Cart::new(user_id));
        add_cart_item(&mut cart, item)?;
        carts.insert(user_id, cart.clone());
        Ok(cart)
    }

    async fn update_item_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<Cart> {
        let mut carts = self.carts.write().await;
        let cart = carts
            .get_mut(&user_id)
            .ok_or_else(|| not_found("Cart", user_id))?;
        // Work on a copy so a rejected update leaves the stored cart untouched.
        let mut updated = cart.clone();
        set_cart_item_quantity(&mut updated, product_id, quantity)?;
        *cart = updated.clone();
        Ok(updated)
    }

    async fn remove_item(&self, item_id: Uuid) -> Result<CartChange> {
        let mut carts = self.carts.write().await;
        let user_id = carts
            .values()
            .find(|c| c.items.iter().any(|i| i.id == item_id))
            .map(|c| c.user_id)
            .ok_or_else(|| not_found("CartItem", item_id))?;

        let cart = carts
            .get_mut(&user_id)
            .ok_or_else(|| not_found("Cart", user_id))?;
        remove_cart_item(cart, item_id)?;

        if cart.is_empty() {
            carts.remove(&user_id);
            return Ok(CartChange {
                user_id,
                cart: None,
            });
        }
        Ok(CartChange {
            user_id,
            cart: Some(cart.clone()),
        })
    }

    async fn remove_items(&self, item_ids: &[Uuid]) -> Result<Vec<CartChange>> {
        let mut carts = self.carts.write().await;
        let mut changes = Vec::new();

        for cart in carts.values_mut() {
            if remove_cart_items(cart, item_ids) > 0 {
                changes.push(CartChange {
                    user_id: cart.user_id,
                    cart: Some(cart.clone()),
                });
            }
        }

        for change in &mut changes {
            if change.cart.as_ref().is_some_and(Cart::is_empty) {
                carts.remove(&change.user_id);
                change.cart = None;
            }
        }

        Ok(changes)
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepository {
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn list_orders_for_user(
        &self,
        user_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut list: Vec<Order> = orders
            .values()
            .filter(|o| o.user_id == user_id)
            .filter(|o| status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn create_order(&self, order: &Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(already_exists("Order", order.id));
        }
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id).ok_or_else(|| not_found("Order", id))?;
        validate_status_transition(order.status, status)?;
        if order.status != status {
            order.status = status;
            order.updated_at = Utc::now();
        }
        Ok(order.clone())
    }
}
