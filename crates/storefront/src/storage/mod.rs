//! Storage backends and the cached repository decorators.
//!
//! The document store backend is selected at compile time:
//!
//! - `inmemory` (default): HashMaps owned by one process. Every instance of a
//!   service has its own documents, so run one instance per service.
//! - `sqlite`: a SQLite database file. Every instance that opens the same
//!   file shares the same documents, which is what the gateway's round-robin
//!   and retry across instances assume.
//!
//! These features are mutually exclusive. The cached decorators wrap either
//! backend with the cache-aside coordinator.

#[cfg(all(feature = "inmemory", feature = "sqlite"))]
compile_error!(
    "Features 'inmemory' and 'sqlite' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite' feature. \
    Example: cargo build -p storefront --no-default-features --features sqlite,redis"
);

pub mod cached;

#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(any(feature = "sqlite", test))]
pub mod sqlite;

pub use cached::{
    CachedCartRepository, CachedOrderRepository, CachedProductRepository, CachedUserRepository,
};

#[cfg(any(feature = "inmemory", test))]
pub use inmemory::InMemoryRepository;

#[cfg(any(feature = "sqlite", test))]
pub use sqlite::SqliteRepository;
