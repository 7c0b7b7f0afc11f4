//! SQLite schema and query constants.
//!
//! Each table keeps the full document as JSON in `document`, plus the
//! columns that queries filter or sort on.

pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    document TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    product_type TEXT NOT NULL,
    price INTEGER NOT NULL,
    document TEXT NOT NULL
);

-- One cart per user
CREATE TABLE IF NOT EXISTS carts (
    user_id TEXT PRIMARY KEY,
    document TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS orders (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL,
    document TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_type ON products(product_type COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS idx_products_price ON products(price);
CREATE INDEX IF NOT EXISTS idx_orders_user_created ON orders(user_id, created_at);
"#;

// User queries
pub const INSERT_USER: &str = r#"
INSERT INTO users (id, created_at, document)
VALUES (?1, ?2, ?3)
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT document FROM users WHERE id = ?1
"#;

pub const SELECT_USERS: &str = r#"
SELECT document FROM users ORDER BY created_at ASC, id ASC
"#;

pub const UPDATE_USER: &str = r#"
UPDATE users SET document = ?2 WHERE id = ?1
"#;

pub const DELETE_USER: &str = r#"
DELETE FROM users WHERE id = ?1
"#;

// Product queries
pub const INSERT_PRODUCT: &str = r#"
INSERT INTO products (id, name, product_type, price, document)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_PRODUCT_BY_ID: &str = r#"
SELECT document FROM products WHERE id = ?1
"#;

pub const SELECT_PRODUCTS: &str = r#"
SELECT document FROM products ORDER BY name ASC, id ASC
"#;

pub const SELECT_PRODUCTS_BY_TYPE: &str = r#"
SELECT document FROM products
WHERE product_type = ?1 COLLATE NOCASE
ORDER BY name ASC, id ASC
"#;

pub const SEARCH_PRODUCTS_PRICE_ASC: &str = r#"
SELECT document FROM products
WHERE (?1 IS NULL OR price >= ?1) AND (?2 IS NULL OR price <= ?2)
ORDER BY price ASC, name ASC, id ASC
LIMIT ?3 OFFSET ?4
"#;

pub const SEARCH_PRODUCTS_PRICE_DESC: &str = r#"
SELECT document FROM products
WHERE (?1 IS NULL OR price >= ?1) AND (?2 IS NULL OR price <= ?2)
ORDER BY price DESC, name ASC, id ASC
LIMIT ?3 OFFSET ?4
"#;

pub const COUNT_PRODUCTS: &str = r#"
SELECT COUNT(*) FROM products
WHERE (?1 IS NULL OR price >= ?1) AND (?2 IS NULL OR price <= ?2)
"#;

pub const UPDATE_PRODUCT: &str = r#"
UPDATE products
SET name = ?2, product_type = ?3, price = ?4, document = ?5
WHERE id = ?1
"#;

pub const DELETE_PRODUCT: &str = r#"
DELETE FROM products WHERE id = ?1
"#;

// Cart queries
pub const SELECT_CART_BY_USER: &str = r#"
SELECT document FROM carts WHERE user_id = ?1
"#;

pub const SELECT_CART_BY_ITEM: &str = r#"
SELECT document FROM carts
WHERE EXISTS (
    SELECT 1 FROM json_each(carts.document, '$.items')
    WHERE json_extract(json_each.value, '$.id') = ?1
)
"#;

pub const SELECT_CARTS: &str = r#"
SELECT document FROM carts
"#;

pub const UPSERT_CART: &str = r#"
INSERT INTO carts (user_id, document)
VALUES (?1, ?2)
ON CONFLICT(user_id) DO UPDATE SET document = excluded.document
"#;

pub const DELETE_CART: &str = r#"
DELETE FROM carts WHERE user_id = ?1
"#;

// Order queries
pub const INSERT_ORDER: &str = r#"
INSERT INTO orders (id, user_id, status, created_at, document)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_ORDER_BY_ID: &str = r#"
SELECT document FROM orders WHERE id = ?1
"#;

pub const SELECT_ORDERS_BY_USER: &str = r#"
SELECT document FROM orders
WHERE user_id = ?1
ORDER BY created_at DESC, id ASC
"#;

pub const SELECT_ORDERS_BY_USER_AND_STATUS: &str = r#"
SELECT document FROM orders
WHERE user_id = ?1 AND status = ?2
ORDER BY created_at DESC, id ASC
"#;

pub const UPDATE_ORDER_STATUS: &str = r#"
UPDATE orders SET status = ?2, document = ?3 WHERE id = ?1
"#;
