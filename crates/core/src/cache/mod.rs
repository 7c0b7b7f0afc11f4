mod error;
mod keys;
mod patterns;
mod policy;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{
    cache_key, cart_count_key, cart_items_key, cart_pattern, order_detail_key,
    order_user_key, order_user_pattern, product_count_key, product_detail_key,
    product_list_all_key, product_list_key, product_list_pattern, product_search_key,
    user_detail_key, ORDER_STATUS_ALL,
};
pub use patterns::pattern_matches;
pub use policy::{CachePolicy, WritePolicy};
pub use serialization::{decode, encode, SerializationError};
pub use traits::Cache;
