//! Per-key write generations.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use lru::LruCache;
use storefront_core::cache::pattern_matches;
use tokio::sync::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};

/// Number of lock stripes serializing cache steps per key.
const STRIPES: usize = 64;

/// A snapshot of a key's generation, taken before a store read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

struct Table {
    keys: LruCache<String, u64>,
    /// Highest generation forgotten through eviction, or raised by a pattern bump.
    floor: u64,
    counter: u64,
}

impl Table {
    fn current(&self, key: &str) -> u64 {
        self.keys.peek(key).copied().unwrap_or(self.floor)
    }

    fn next(&mut self) -> u64 {
        self.counter += 1;
        self.counter
    }
}

/// Tracks a monotonically increasing generation per recently written key.
///
/// Generations come from one global counter, so forgetting a key (LRU
/// eviction) is safe: the table floor rises to at least the forgotten value
/// and any snapshot taken before the forgotten write no longer matches.
pub struct WriteGenerations {
    table: Mutex<Table>,
    stripes: Vec<AsyncMutex<()>>,
}

impl WriteGenerations {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            table: Mutex::new(Table {
                keys: LruCache::new(capacity),
                floor: 0,
                counter: 0,
            }),
            stripes: (0..STRIPES).map(|_| AsyncMutex::new(())).collect(),
        }
    }

    fn with_table<T>(&self, f: impl FnOnce(&mut Table) -> T) -> T {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut table)
    }

    pub fn snapshot(&self, key: &str) -> Generation {
        Generation(self.with_table(|t| t.current(key)))
    }

    pub fn is_current(&self, key: &str, seen: Generation) -> bool {
        self.snapshot(key) == seen
    }

    /// Marks `key` as written.
    pub fn bump(&self, key: &str) {
        self.with_table(|t| {
            let generation = t.next();
            if let Some((evicted, old)) = t.keys.push(key.to_string(), generation) {
                if evicted != key {
                    t.floor = t.floor.max(old);
                }
            }
        });
    }

    /// Marks every key matching `pattern` as written, including keys this
    /// table has never seen.
    pub fn bump_pattern(&self, pattern: &str) {
        self.with_table(|t| {
            let generation = t.next();
            t.floor = generation;
            let matching: Vec<String> = t
                .keys
                .iter()
                .filter(|(key, _)| pattern_matches(pattern, key))
                .map(|(key, _)| key.clone())
                .collect();
            for key in matching {
                t.keys.put(key, generation);
            }
        });
    }

    /// Locks the stripe guarding `key`.
    pub async fn lock(&self, key: &str) -> AsyncMutexGuard<'_, ()> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let index = (hasher.finish() as usize) % self.stripes.len();
        self.stripes[index].lock().await
    }

    /// Locks every stripe, in order.
    pub async fn lock_all(&self) -> Vec<AsyncMutexGuard<'_, ()>> {
        let mut guards = Vec::with_capacity(self.stripes.len());
        for stripe in &self.stripes {
            guards.push(stripe.lock().await);
        }
        guards
    }
}
