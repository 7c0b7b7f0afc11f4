//! Cached repository decorators.
//!
//! Each decorator wraps a repository with the cache-aside coordinator and
//! owns the cache keys and write policy of its entity:
//!
//! | Entity  | Keys                                   | On mutation                        |
//! |---------|----------------------------------------|------------------------------------|
//! | user    | `user-detail:{id}`                     | update detail                      |
//! | product | `product-detail:{id}`, `product-list:*` | update detail, drop all lists |
//! | cart    | `cart:{user}:items`, `cart:{user}:count` | drop `cart:{user}:*`             |
//! | order   | `order-detail:{id}`, `order-user:{user}:{status}` | update detail, drop user lists |
//!
//! Deletions always invalidate.

mod cart;
mod order;
mod product;
mod user;

pub use cart::CachedCartRepository;
pub use order::CachedOrderRepository;
pub use product::CachedProductRepository;
pub use user::CachedUserRepository;
