use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Key/value operations over a best-effort cache.
///
/// Any call may fail transiently. Callers must treat an error exactly like a
/// miss (for reads) or a skipped write (for writes).
#[async_trait]
pub trait Cache: Send + Sync {
    /// `Ok(None)` on a miss or an expired entry.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`. `None` means no expiry.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Deletes all values whose key matches a `*` glob (e.g. `"cart:42:*"`).
    async fn delete_pattern(&self, pattern: &str) -> Result<()>;
}
