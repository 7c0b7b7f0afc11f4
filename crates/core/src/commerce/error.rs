use thiserror::Error;
use uuid::Uuid;

use super::OrderStatus;

/// Errors raised by commerce validation and pure cart/order operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommerceError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },
    #[error("Quantity must be greater than 0")]
    InvalidQuantity,
    #[error("Product already exists in the cart: {0}")]
    DuplicateProduct(Uuid),
    #[error("Cart item not found: {0}")]
    ItemNotFound(Uuid),
    #[error("Order must contain at least one line")]
    EmptyOrder,
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),
    #[error("Cannot move order from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },
    #[error("price_min ({min}) is greater than price_max ({max})")]
    InvalidPriceRange { min: u64, max: u64 },
    #[error("{0} must be at least 1")]
    InvalidPagination(&'static str),
}

impl CommerceError {
    /// HTTP status code for this error. All variants are caller mistakes
    /// except a missing cart item, which is reported as 404.
    pub fn status_code(&self) -> u16 {
        match self {
            CommerceError::ItemNotFound(_) => 404,
            CommerceError::DuplicateProduct(_) | CommerceError::InvalidStatusTransition { .. } => {
                409
            }
            _ => 400,
        }
    }
}
