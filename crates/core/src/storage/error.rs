use thiserror::Error;

use crate::commerce::CommerceError;

/// Errors that can occur during document store operations.
///
/// Unlike cache errors these are never absorbed: they fail the operation
/// and are surfaced to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Store operation timed out after {0}ms")]
    Timeout(u64),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<CommerceError> for StoreError {
    fn from(err: CommerceError) -> Self {
        match err {
            CommerceError::DuplicateProduct(product_id) => StoreError::AlreadyExists {
                entity_type: "CartItem",
                id: product_id.to_string(),
            },
            CommerceError::ItemNotFound(id) => StoreError::NotFound {
                entity_type: "CartItem",
                id: id.to_string(),
            },
            other => StoreError::InvalidData(other.to_string()),
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StoreError>;
