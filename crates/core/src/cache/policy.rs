use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What the cache-aside layer does with a key after a successful store mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Delete the key; the next read repopulates it from the store.
    Invalidate,
    /// Overwrite the key with the post-mutation value.
    Update,
}

/// Per-entity caching rules: how long entries live and how writes are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Duration,
    pub write: WritePolicy,
}

impl CachePolicy {
    /// A policy that deletes keys on mutation.
    pub fn invalidate(ttl: Duration) -> Self {
        Self {
            ttl,
            write: WritePolicy::Invalidate,
        }
    }

    /// A policy that overwrites keys with the fresh value on mutation.
    pub fn update(ttl: Duration) -> Self {
        Self {
            ttl,
            write: WritePolicy::Update,
        }
    }

    /// Same TTL, but mutations delete the key.
    ///
    /// Deletions always go through this: there is no post-mutation value to
    /// write back.
    pub fn invalidating(self) -> Self {
        Self::invalidate(self.ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let ttl = Duration::from_secs(60);
        assert_eq!(CachePolicy::update(ttl).write, WritePolicy::Update);
        assert_eq!(CachePolicy::invalidate(ttl).write, WritePolicy::Invalidate);
    }

    #[test]
    fn test_invalidating_keeps_ttl() {
        let policy = CachePolicy::update(Duration::from_secs(3600)).invalidating();
        assert_eq!(policy.write, WritePolicy::Invalidate);
        assert_eq!(policy.ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_write_policy_serde_names() {
        assert_eq!(
            serde_json::to_string(&WritePolicy::Invalidate).unwrap(),
            "\"invalidate\""
        );
        let parsed: WritePolicy = serde_json::from_str("\"update\"").unwrap();
        assert_eq!(parsed, WritePolicy::Update);
    }
}
