mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{Result, StoreError};
pub use http_mapping::store_error_to_status_code;
pub use traits::{CartRepository, OrderRepository, ProductRepository, UserRepository};
pub use types::{CartChange, Page, PriceRange, PriceSort, ProductSearch};
