//! Redis cache backend, shared by every instance of a service.

mod cache;
mod error;

pub use cache::RedisCache;
