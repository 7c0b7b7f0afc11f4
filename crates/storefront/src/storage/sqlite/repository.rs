//! SQLite repository implementation.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, types::Value, OptionalExtension, TransactionBehavior};
use serde::de::DeserializeOwned;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use storefront_core::commerce::{
    add_cart_item, remove_cart_item, remove_cart_items, set_cart_item_quantity,
    validate_status_transition, Cart, CartItem, Order, OrderStatus, Product, User,
};
use storefront_core::storage::{
    CartChange, CartRepository, OrderRepository, PriceRange, PriceSort, ProductRepository,
    ProductSearch, Result, StoreError, UserRepository,
};

use super::conversions::{
    bound_to_sql, encode_document, format_datetime, price_to_sql, row_to_document, to_document,
};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// How long a write waits for another connection's lock before failing.
pub(super) const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

fn not_found(entity_type: &'static str, id: Uuid) -> StoreError {
    StoreError::NotFound {
        entity_type,
        id: id.to_string(),
    }
}

/// Fails with `QueryReturnedNoRows` when an UPDATE or DELETE touched nothing.
fn expect_row(rows: usize) -> tokio_rusqlite::Result<()> {
    if rows == 0 {
        Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
    } else {
        Ok(())
    }
}

/// SQLite-backed document store.
///
/// Every process that opens the same database file shares its documents.
/// Read-modify-write operations (cart items, order status) run inside
/// `IMMEDIATE` transactions: concurrent writers, including ones in other
/// processes, queue on the database lock instead of overwriting each other.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens (or creates) the database file at `path` and its schema.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        Self::init(&conn).await?;
        Ok(Self { conn })
    }

    /// Opens a private in-memory database. Nothing is shared or persisted.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        Self::init(&conn).await?;
        Ok(Self { conn })
    }

    async fn init(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT).map_err(wrap_err)?;
            // WAL lets readers in other processes proceed during a write.
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            })
            .map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::ConnectionFailed(e.to_string()))
    }

    /// Reads at most one document keyed by `key`.
    async fn fetch_one<T>(
        &self,
        sql: &'static str,
        key: String,
        entity_type: &'static str,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let id = key.clone();
        self.conn
            .call(move |conn| {
                conn.query_row(sql, [&key], row_to_document::<T>)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type, id))
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        self.fetch_one(schema::SELECT_USER_BY_ID, id.to_string(), "User")
            .await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_USERS).map_err(wrap_err)?;
                let rows = stmt
                    .query_map((), row_to_document::<User>)
                    .map_err(wrap_err)?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", "*"))
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let id = user.id.to_string();
        let created_at = format_datetime(&user.created_at);
        let document = to_document(user)?;

        self.conn
            .call(move |conn| {
                conn.execute(schema::INSERT_USER, params![id, created_at, document])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", user.id.to_string()))
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let id = user.id.to_string();
        let document = to_document(user)?;

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::UPDATE_USER, params![id, document])
                    .map_err(wrap_err)?;
                expect_row(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", user.id.to_string()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_USER, [&id_str])
                    .map_err(wrap_err)?;
                expect_row(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", id.to_string()))
    }
}

// ============================================================================
// ProductRepository implementation
// ============================================================================

impl SqliteRepository {
    async fn query_products(
        &self,
        sql: &'static str,
        values: Vec<Value>,
    ) -> Result<Vec<Product>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(values), row_to_document::<Product>)
                    .map_err(wrap_err)?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Product", "*"))
    }
}

/// Binds an optional bound as INTEGER or NULL.
fn bound_value(bound: Option<u64>) -> Value {
    bound_to_sql(bound).map_or(Value::Null, Value::Integer)
}

#[async_trait]
impl ProductRepository for SqliteRepository {
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        self.fetch_one(schema::SELECT_PRODUCT_BY_ID, id.to_string(), "Product")
            .await
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        self.query_products(schema::SELECT_PRODUCTS, Vec::new())
            .await
    }

    async fn list_products_by_type(&self, product_type: &str) -> Result<Vec<Product>> {
        self.query_products(
            schema::SELECT_PRODUCTS_BY_TYPE,
            vec![product_type.to_string().into()],
        )
        .await
    }

    async fn search_products(&self, search: &ProductSearch) -> Result<Vec<Product>> {
        let sql = match search.sort {
            PriceSort::PriceAsc => schema::SEARCH_PRODUCTS_PRICE_ASC,
            PriceSort::PriceDesc => schema::SEARCH_PRODUCTS_PRICE_DESC,
        };
        let offset = i64::try_from(search.page.offset()).unwrap_or(i64::MAX);
        self.query_products(
            sql,
            vec![
                bound_value(search.price.min),
                bound_value(search.price.max),
                i64::from(search.page.limit).into(),
                offset.into(),
            ],
        )
        .await
    }

    async fn count_products(&self, range: &PriceRange) -> Result<u64> {
        let min = bound_to_sql(range.min);
        let max = bound_to_sql(range.max);

        let count = self
            .conn
            .call(move |conn| {
                conn.query_row(schema::COUNT_PRODUCTS, params![min, max], |row| {
                    row.get::<_, i64>(0)
                })
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Product", "*"))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn create_product(&self, product: &Product) -> Result<()> {
        let id = product.id.to_string();
        let name = product.name.clone();
        let product_type = product.product_type.clone();
        let price = price_to_sql(product.price)?;
        let document = to_document(product)?;

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_PRODUCT,
                    params![id, name, product_type, price, document],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Product", product.id.to_string()))
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        let id = product.id.to_string();
        let name = product.name.clone();
        let product_type = product.product_type.clone();
        let price = price_to_sql(product.price)?;
        let document = to_document(product)?;

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_PRODUCT,
                        params![id, name, product_type, price, document],
                    )
                    .map_err(wrap_err)?;
                expect_row(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Product", product.id.to_string()))
    }

    async fn delete_product(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_PRODUCT, [&id_str])
                    .map_err(wrap_err)?;
                expect_row(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Product", id.to_string()))
    }
}

// ============================================================================
// CartRepository implementation
// ============================================================================

fn save_cart(tx: &rusqlite::Transaction<'_>, cart: &Cart) -> rusqlite::Result<()> {
    let document = encode_document(cart)?;
    tx.execute(
        schema::UPSERT_CART,
        params![cart.user_id.to_string(), document],
    )?;
    Ok(())
}

/// Saves a cart that lost items, deleting it once it is empty.
fn save_or_drop_cart(tx: &rusqlite::Transaction<'_>, cart: Cart) -> rusqlite::Result<CartChange> {
    if cart.is_empty() {
        tx.execute(schema::DELETE_CART, [cart.user_id.to_string()])?;
        return Ok(CartChange {
            user_id: cart.user_id,
            cart: None,
        });
    }
    save_cart(tx, &cart)?;
    Ok(CartChange {
        user_id: cart.user_id,
        cart: Some(cart),
    })
}

#[async_trait]
impl CartRepository for SqliteRepository {
    async fn get_cart(&self, user_id: Uuid) -> Result<Option<Cart>> {
        self.fetch_one(schema::SELECT_CART_BY_USER, user_id.to_string(), "Cart")
            .await
    }

    async fn add_item(&self, user_id: Uuid, item: CartItem) -> Result<Cart> {
        self.conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;
                let mut cart = tx
                    .query_row(
                        schema::SELECT_CART_BY_USER,
                        [user_id.to_string()],
                        row_to_document::<Cart>,
                    )
                    .optional()
                    .map_err(wrap_err)?
                    .unwrap_or_else(|| Cart::new(user_id));
                if let Err(e) = add_cart_item(&mut cart, item) {
                    return Ok(Err(StoreError::from(e)));
                }
                save_cart(&tx, &cart).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(Ok(cart))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Cart", user_id.to_string()))?
    }

    async fn update_item_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<Cart> {
        self.conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;
                let Some(mut cart) = tx
                    .query_row(
                        schema::SELECT_CART_BY_USER,
                        [user_id.to_string()],
                        row_to_document::<Cart>,
                    )
                    .optional()
                    .map_err(wrap_err)?
                else {
                    return Ok(Err(not_found("Cart", user_id)));
                };
                if let Err(e) = set_cart_item_quantity(&mut cart, product_id, quantity) {
                    return Ok(Err(StoreError::from(e)));
                }
                save_cart(&tx, &cart).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(Ok(cart))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Cart", user_id.to_string()))?
    }

    async fn remove_item(&self, item_id: Uuid) -> Result<CartChange> {
        self.conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;
                let Some(mut cart) = tx
                    .query_row(
                        schema::SELECT_CART_BY_ITEM,
                        [item_id.to_string()],
                        row_to_document::<Cart>,
                    )
                    .optional()
                    .map_err(wrap_err)?
                else {
                    return Ok(Err(not_found("CartItem", item_id)));
                };
                if let Err(e) = remove_cart_item(&mut cart, item_id) {
                    return Ok(Err(StoreError::from(e)));
                }
                let change = save_or_drop_cart(&tx, cart).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(Ok(change))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "CartItem", item_id.to_string()))?
    }

    async fn remove_items(&self, item_ids: &[Uuid]) -> Result<Vec<CartChange>> {
        let item_ids = item_ids.to_vec();

        self.conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;
                let carts = {
                    let mut stmt = tx.prepare(schema::SELECT_CARTS).map_err(wrap_err)?;
                    let rows = stmt
                        .query_map((), row_to_document::<Cart>)
                        .map_err(wrap_err)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()
                        .map_err(wrap_err)?
                };

                let mut changes = Vec::new();
                for mut cart in carts {
                    if remove_cart_items(&mut cart, &item_ids) > 0 {
                        changes.push(save_or_drop_cart(&tx, cart).map_err(wrap_err)?);
                    }
                }
                tx.commit().map_err(wrap_err)?;
                Ok(changes)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "CartItem", "*"))
    }
}

// ============================================================================
// OrderRepository implementation
// ============================================================================

#[async_trait]
impl OrderRepository for SqliteRepository {
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
        self.fetch_one(schema::SELECT_ORDER_BY_ID, id.to_string(), "Order")
            .await
    }

    async fn list_orders_for_user(
        &self,
        user_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>> {
        let user = user_id.to_string();

        self.conn
            .call(move |conn| {
                let orders = match status {
                    Some(status) => {
                        let mut stmt = conn
                            .prepare(schema::SELECT_ORDERS_BY_USER_AND_STATUS)
                            .map_err(wrap_err)?;
                        let rows = stmt
                            .query_map([user.as_str(), status.as_str()], row_to_document::<Order>)
                            .map_err(wrap_err)?;
                        rows.collect::<rusqlite::Result<Vec<_>>>()
                    }
                    None => {
                        let mut stmt = conn
                            .prepare(schema::SELECT_ORDERS_BY_USER)
                            .map_err(wrap_err)?;
                        let rows = stmt
                            .query_map([user.as_str()], row_to_document::<Order>)
                            .map_err(wrap_err)?;
                        rows.collect::<rusqlite::Result<Vec<_>>>()
                    }
                };
                orders.map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Order", user_id.to_string()))
    }

    async fn create_order(&self, order: &Order) -> Result<()> {
        let id = order.id.to_string();
        let user_id = order.user_id.to_string();
        let status = order.status.as_str();
        let created_at = format_datetime(&order.created_at);
        let document = to_document(order)?;

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_ORDER,
                    params![id, user_id, status, created_at, document],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Order", order.id.to_string()))
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order> {
        self.conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;
                let Some(mut order) = tx
                    .query_row(
                        schema::SELECT_ORDER_BY_ID,
                        [id.to_string()],
                        row_to_document::<Order>,
                    )
                    .optional()
                    .map_err(wrap_err)?
                else {
                    return Ok(Err(not_found("Order", id)));
                };
                if let Err(e) = validate_status_transition(order.status, status) {
                    return Ok(Err(StoreError::from(e)));
                }
                if order.status != status {
                    order.status = status;
                    order.updated_at = Utc::now();
                    let document = encode_document(&order).map_err(wrap_err)?;
                    tx.execute(
                        schema::UPDATE_ORDER_STATUS,
                        params![id.to_string(), status.as_str(), document],
                    )
                    .map_err(wrap_err)?;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(Ok(order))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Order", id.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::commerce::{line_total, OrderLine};
    use storefront_core::storage::Page;

    fn item(product_id: Uuid, quantity: u32) -> CartItem {
        CartItem {
            id: Uuid::new_v4(),
            product_id,
            name: "Keyboard".to_string(),
            image: None,
            color: None,
            unit_price: 4_500,
            quantity,
            discount: None,
            total_price: line_total(4_500, quantity),
        }
    }

    fn order(user_id: Uuid, minutes_ago: i64) -> Order {
        let at = Utc::now() - chrono::Duration::minutes(minutes_ago);
        Order {
            id: Uuid::new_v4(),
            user_id,
            lines: vec![OrderLine {
                product_id: Uuid::new_v4(),
                name: "Keyboard".to_string(),
                quantity: 1,
                unit_price: 4_500,
            }],
            total_price: 4_500,
            shipping_address: None,
            status: OrderStatus::Pending,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_user_crud() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let mut user = User::new("Ann");

        repo.create_user(&user).await.unwrap();
        assert_eq!(
            repo.create_user(&user).await,
            Err(StoreError::AlreadyExists {
                entity_type: "User",
                id: user.id.to_string(),
            })
        );

        user.name = "Annie".to_string();
        repo.update_user(&user).await.unwrap();
        assert_eq!(repo.get_user(user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(repo.list_users().await.unwrap().len(), 1);

        repo.delete_user(user.id).await.unwrap();
        assert!(repo.get_user(user.id).await.unwrap().is_none());
        assert!(matches!(
            repo.update_user(&user).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_product_queries() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        for (name, product_type, price) in [
            ("Zen 14", "LAPTOP", 90_000),
            ("Air 13", "LAPTOP", 120_000),
            ("Tower", "PC", 150_000),
        ] {
            repo.create_product(&Product::new(name, product_type, price))
                .await
                .unwrap();
        }

        let laptops = repo.list_products_by_type("laptop").await.unwrap();
        let names: Vec<&str> = laptops.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Air 13", "Zen 14"]);
        assert_eq!(repo.list_products().await.unwrap().len(), 3);

        let range = PriceRange::new(Some(100_000), None).unwrap();
        let search = ProductSearch {
            price: range,
            sort: PriceSort::PriceDesc,
            page: Page::new(1, 1).unwrap(),
        };
        let first = repo.search_products(&search).await.unwrap();
        let second = repo
            .search_products(&ProductSearch {
                page: Page::new(2, 1).unwrap(),
                ..search
            })
            .await
            .unwrap();
        assert_eq!(first[0].name, "Tower");
        assert_eq!(second[0].name, "Air 13");
        assert_eq!(repo.count_products(&range).await.unwrap(), 2);
        assert_eq!(repo.count_products(&PriceRange::default()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_cart_lifecycle() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let user_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();
        let first = item(product_id, 1);

        repo.add_item(user_id, first.clone()).await.unwrap();
        assert!(matches!(
            repo.add_item(user_id, item(product_id, 2)).await,
            Err(StoreError::AlreadyExists { .. })
        ));
        let cart = repo
            .update_item_quantity(user_id, product_id, 3)
            .await
            .unwrap();
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(repo.count_items(user_id).await.unwrap(), 1);

        let change = repo.remove_item(first.id).await.unwrap();
        assert_eq!(change.user_id, user_id);
        assert!(change.was_deleted());
        assert!(repo.get_cart(user_id).await.unwrap().is_none());
        assert!(matches!(
            repo.remove_item(first.id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_remove_items_across_carts() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let (ann, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let ann_item = item(Uuid::new_v4(), 1);
        let ann_kept = item(Uuid::new_v4(), 1);
        let bob_item = item(Uuid::new_v4(), 1);
        repo.add_item(ann, ann_item.clone()).await.unwrap();
        repo.add_item(ann, ann_kept.clone()).await.unwrap();
        repo.add_item(bob, bob_item.clone()).await.unwrap();

        let mut changes = repo
            .remove_items(&[ann_item.id, bob_item.id])
            .await
            .unwrap();
        changes.sort_by_key(|c| c.was_deleted());

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].user_id, ann);
        assert_eq!(changes[0].cart.as_ref().unwrap().items, vec![ann_kept]);
        assert_eq!(changes[1].user_id, bob);
        assert!(changes[1].was_deleted());
    }

    #[tokio::test]
    async fn test_orders_newest_first_and_status_changes() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let user_id = Uuid::new_v4();
        let old = order(user_id, 10);
        let new = order(user_id, 1);
        repo.create_order(&old).await.unwrap();
        repo.create_order(&new).await.unwrap();

        let listed = repo.list_orders_for_user(user_id, None).await.unwrap();
        assert_eq!(listed[0].id, new.id);
        assert_eq!(listed[1].id, old.id);

        let confirmed = repo
            .update_order_status(old.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.status, OrderStatus::Confirmed);
        let filtered = repo
            .list_orders_for_user(user_id, Some(OrderStatus::Confirmed))
            .await
            .unwrap();
        assert_eq!(filtered, vec![confirmed]);

        repo.update_order_status(new.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert!(matches!(
            repo.update_order_status(new.id, OrderStatus::Confirmed).await,
            Err(StoreError::InvalidData(_))
        ));
        assert_eq!(
            repo.get_order(new.id).await.unwrap().unwrap().status,
            OrderStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_handles_on_one_file_share_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.db");
        let a = SqliteRepository::new(&path).await.unwrap();
        let b = SqliteRepository::new(&path).await.unwrap();
        let user = User::new("Ann");
        let user_id = Uuid::new_v4();

        a.create_user(&user).await.unwrap();
        a.add_item(user_id, item(Uuid::new_v4(), 1)).await.unwrap();
        b.add_item(user_id, item(Uuid::new_v4(), 1)).await.unwrap();

        assert_eq!(b.get_user(user.id).await.unwrap(), Some(user));
        assert_eq!(a.count_items(user_id).await.unwrap(), 2);
    }
}
