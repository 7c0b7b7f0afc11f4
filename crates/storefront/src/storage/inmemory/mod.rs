//! In-memory document store.
//!
//! Stores all documents in HashMaps wrapped in `Arc<RwLock<_>>`. Data lives
//! as long as the process and is not visible to other instances.

mod repository;

pub use repository::InMemoryRepository;
