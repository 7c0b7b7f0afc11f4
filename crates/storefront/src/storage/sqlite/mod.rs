//! SQLite document store.
//!
//! Uses `rusqlite` for the database and `tokio-rusqlite` to run its
//! blocking calls off the async runtime. Several processes may open the
//! same database file; they see each other's committed writes.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
