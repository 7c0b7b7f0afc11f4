//! Pure mapping from store errors to HTTP status codes.

use super::StoreError;

/// Maps a [`StoreError`] to an HTTP status code.
///
/// - `NotFound` -> 404
/// - `AlreadyExists` -> 409
/// - `ConnectionFailed` -> 503
/// - `Timeout` -> 504
/// - `QueryFailed` -> 500
/// - `InvalidData` -> 400
///
/// # Examples
///
/// ```
/// use storefront_core::storage::{store_error_to_status_code, StoreError};
///
/// assert_eq!(store_error_to_status_code(&StoreError::Timeout(5000)), 504);
/// ```
pub fn store_error_to_status_code(error: &StoreError) -> u16 {
    match error {
        StoreError::NotFound { .. } => 404,
        StoreError::AlreadyExists { .. } => 409,
        StoreError::ConnectionFailed(_) => 503,
        StoreError::Timeout(_) => 504,
        StoreError::QueryFailed(_) => 500,
        StoreError::InvalidData(_) => 400,
    }
}
