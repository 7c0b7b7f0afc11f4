use async_trait::async_trait;
use uuid::Uuid;

use crate::commerce::{Cart, CartItem, Order, OrderStatus, Product, User};

use super::{CartChange, PriceRange, ProductSearch, Result};

/// Repository for user documents.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by ID.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Lists all users.
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Creates a new user.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Replaces an existing user.
    async fn update_user(&self, user: &User) -> Result<()>;

    /// Deletes a user by ID.
    async fn delete_user(&self, id: Uuid) -> Result<()>;
}

/// Repository for catalog products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>>;

    /// Lists the whole catalog, ordered by name.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Lists products of one type (case-insensitive).
    async fn list_products_by_type(&self, product_type: &str) -> Result<Vec<Product>>;

    /// Filters by price, sorts by price and returns one page.
    async fn search_products(&self, search: &ProductSearch) -> Result<Vec<Product>>;

    /// Number of products priced within `range`.
    async fn count_products(&self, range: &PriceRange) -> Result<u64>;

    async fn create_product(&self, product: &Product) -> Result<()>;

    async fn update_product(&self, product: &Product) -> Result<()>;

    async fn delete_product(&self, id: Uuid) -> Result<()>;
}

/// Repository for carts. Each user owns at most one cart document.
///
/// Item-level mutations are single store operations so that concurrent
/// requests against one cart cannot lose each other's items.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Gets the cart of a user.
    async fn get_cart(&self, user_id: Uuid) -> Result<Option<Cart>>;

    /// Number of items in a user's cart; zero when the user has no cart.
    async fn count_items(&self, user_id: Uuid) -> Result<usize> {
        Ok(self
            .get_cart(user_id)
            .await?
            .map_or(0, |cart| cart.item_count()))
    }

    /// Adds an item, creating the cart if the user has none.
    async fn add_item(&self, user_id: Uuid, item: CartItem) -> Result<Cart>;

    /// Changes the quantity of the line holding `product_id`.
    async fn update_item_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<Cart>;

    /// Removes one item by item ID. Deletes the cart when it becomes empty.
    async fn remove_item(&self, item_id: Uuid) -> Result<CartChange>;

    /// Removes several items, possibly across carts. Returns one change per affected cart.
    async fn remove_items(&self, item_ids: &[Uuid]) -> Result<Vec<CartChange>>;
}

/// Repository for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>>;

    /// Lists a user's orders, newest first, optionally filtered by status.
    async fn list_orders_for_user(
        &self,
        user_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>>;

    async fn create_order(&self, order: &Order) -> Result<()>;

    /// Moves an order to a new status and returns the updated order.
    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order>;
}
