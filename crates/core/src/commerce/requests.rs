//! API request types for the storefront services.
//!
//! Pure data types with conversion into domain values; no I/O.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::serde::deserialize_optional_string;
use crate::storage::{Page, PriceRange, PriceSort, ProductSearch};

use super::operations::line_total;
use super::types::{CartItem, OrderLine, OrderStatus, Product, User};
use super::CommerceError;

/// Request payload for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub address: Option<String>,
}

impl CreateUserRequest {
    pub fn into_user(self) -> User {
        let mut user = User::new(self.name.trim());
        user.email = self.email;
        user.phone = self.phone;
        user.address = self.address;
        user
    }
}

/// Request payload for updating a user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub address: Option<String>,
}

impl UpdateUserRequest {
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = self.email {
            user.email = Some(email);
        }
        if let Some(phone) = self.phone {
            user.phone = Some(phone);
        }
        if let Some(address) = self.address {
            user.address = Some(address);
        }
        user.updated_at = Utc::now();
    }
}

/// Request payload for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub product_type: String,
    pub price: u64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
}

impl CreateProductRequest {
    pub fn into_product(self) -> Product {
        let mut product = Product::new(
            self.name.trim(),
            self.product_type.trim().to_uppercase(),
            self.price,
        )
        .with_stock(self.stock);
        product.description = self.description;
        product
    }
}

/// Request payload for updating a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub product_type: Option<String>,
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
}

impl UpdateProductRequest {
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name.trim().to_string();
        }
        if let Some(product_type) = self.product_type {
            product.product_type = product_type.trim().to_uppercase();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(description) = self.description {
            product.description = Some(description);
        }
        product.updated_at = Utc::now();
    }
}

/// Query parameters for listing products.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListProductsQuery {
    /// Product type filter; defaults to `LAPTOP`.
    #[serde(default, rename = "type", deserialize_with = "deserialize_optional_string")]
    pub product_type: Option<String>,
}

impl ListProductsQuery {
    pub fn product_type(&self) -> String {
        self.product_type
            .as_deref()
            .map(|t| t.trim().to_uppercase())
            .unwrap_or_else(|| "LAPTOP".to_string())
    }
}

/// Query parameters for the price search and the product count.
///
/// The count ignores `sort_by`, `page` and `limit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductSearchQuery {
    #[serde(default)]
    pub price_min: Option<u64>,
    #[serde(default)]
    pub price_max: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ProductSearchQuery {
    pub fn price_range(&self) -> Result<PriceRange, CommerceError> {
        PriceRange::new(self.price_min, self.price_max)
    }

    pub fn into_search(self) -> Result<ProductSearch, CommerceError> {
        Ok(ProductSearch {
            price: self.price_range()?,
            sort: PriceSort::parse(self.sort_by.as_deref()),
            page: Page::new(
                self.page.unwrap_or(1),
                self.limit.unwrap_or(Page::DEFAULT_LIMIT),
            )?,
        })
    }
}

/// Request payload for adding a product to a user's cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCartItemRequest {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub unit_price: u64,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub color: Option<String>,
    #[serde(default)]
    pub discount: Option<u8>,
    /// Client-computed total. Ignored in favor of the server-side value.
    #[serde(default)]
    pub total_price: Option<u64>,
}

impl AddCartItemRequest {
    /// Validates the request and converts it into a cart item.
    ///
    /// The stored total is always recomputed; a disagreeing client total is
    /// reported through the second tuple element so the caller can log it.
    pub fn into_item(self) -> Result<(CartItem, Option<u64>), CommerceError> {
        if self.name.trim().is_empty() {
            return Err(CommerceError::MissingField("name"));
        }
        if self.quantity == 0 {
            return Err(CommerceError::InvalidQuantity);
        }
        let total_price = line_total(self.unit_price, self.quantity);
        let mismatch = self.total_price.filter(|client| *client != total_price);
        let item = CartItem {
            id: Uuid::new_v4(),
            product_id: self.product_id,
            name: self.name.trim().to_string(),
            image: self.image,
            color: self.color,
            unit_price: self.unit_price,
            quantity: self.quantity,
            discount: self.discount,
            total_price,
        };
        Ok((item, mismatch))
    }
}

/// Request payload for changing the quantity of a product in a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCartItemRequest {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
}

/// Request payload for removing several cart items at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveCartItemsRequest {
    pub item_ids: Vec<Uuid>,
}

/// Request payload for placing an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: Uuid,
    pub lines: Vec<OrderLine>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub shipping_address: Option<String>,
}

/// Query parameters for listing a user's orders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOrdersQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub status: Option<String>,
}

impl ListOrdersQuery {
    /// Parses the optional status filter.
    pub fn status(&self) -> Result<Option<OrderStatus>, CommerceError> {
        self.status.as_deref().map(str::parse).transpose()
    }
}

/// Request payload for moving an order to a new status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub order_id: Uuid,
    pub status: OrderStatus,
}
