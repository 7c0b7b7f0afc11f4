//! Cache key derivation.
//!
//! Keys follow `<entity-type>:<identifier>[:<qualifier>]`. The format is
//! shared by every service instance, so changing it invalidates caches
//! across the whole deployment.

use std::fmt::Display;

use crate::storage::{PriceRange, ProductSearch};

/// Qualifier used for order listings that are not filtered by status.
pub const ORDER_STATUS_ALL: &str = "all";

/// Builds a cache key from its parts.
///
/// # Examples
///
/// ```
/// use storefront_core::cache::cache_key;
///
/// assert_eq!(cache_key("user-detail", 42, None), "user-detail:42");
/// assert_eq!(cache_key("order-user", "u1", Some("pending")), "order-user:u1:pending");
/// ```
pub fn cache_key(entity_type: &str, id: impl Display, qualifier: Option<&str>) -> String {
    match qualifier {
        Some(q) => format!("{entity_type}:{id}:{q}"),
        None => format!("{entity_type}:{id}"),
    }
}

/// Returns the cache key for a single user.
pub fn user_detail_key(user_id: impl Display) -> String {
    cache_key("user-detail", user_id, None)
}

/// Returns the cache key for a single product.
pub fn product_detail_key(product_id: impl Display) -> String {
    cache_key("product-detail", product_id, None)
}

/// Returns the cache key for the product listing of one product type.
pub fn product_list_key(product_type: &str) -> String {
    cache_key("product-list", product_type.to_lowercase(), None)
}

/// Returns the cache key for the unfiltered catalog listing.
pub fn product_list_all_key() -> String {
    cache_key("product-list", "all", Some("items"))
}

fn price_bound(bound: Option<u64>) -> String {
    bound.map_or_else(|| "any".to_string(), |b| b.to_string())
}

/// Returns the cache key for one page of a price search.
pub fn product_search_key(search: &ProductSearch) -> String {
    format!(
        "product-list:price:{}:{}:{}:{}:{}",
        price_bound(search.price.min),
        price_bound(search.price.max),
        search.sort,
        search.page.number,
        search.page.limit
    )
}

/// Returns the cache key for the product count within a price range.
pub fn product_count_key(range: &PriceRange) -> String {
    format!(
        "product-list:count:{}:{}",
        price_bound(range.min),
        price_bound(range.max)
    )
}

/// Returns the pattern matching every product listing.
pub fn product_list_pattern() -> String {
    "product-list:*".to_string()
}

/// Returns the cache key for a user's cart document.
pub fn cart_items_key(user_id: impl Display) -> String {
    cache_key("cart", user_id, Some("items"))
}

/// Returns the cache key for a user's cart item count.
pub fn cart_count_key(user_id: impl Display) -> String {
    cache_key("cart", user_id, Some("count"))
}

/// Returns the pattern matching every cached view of a user's cart.
pub fn cart_pattern(user_id: impl Display) -> String {
    format!("cart:{user_id}:*")
}

/// Returns the cache key for a single order.
pub fn order_detail_key(order_id: impl Display) -> String {
    cache_key("order-detail", order_id, None)
}

/// Returns the cache key for a user's order listing, optionally filtered by status.
pub fn order_user_key(user_id: impl Display, status: Option<&str>) -> String {
    let qualifier = status
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(ORDER_STATUS_ALL);
    cache_key("order-user", user_id, Some(qualifier))
}

/// Returns the pattern matching every order listing of a user.
pub fn order_user_pattern(user_id: impl Display) -> String {
    format!("order-user:{user_id}:*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::pattern_matches;
    use crate::storage::{Page, PriceSort};
    use uuid::Uuid;

    #[test]
    fn test_user_detail_key() {
        assert_eq!(user_detail_key(42), "user-detail:42");
    }

    #[test]
    fn test_product_keys() {
        let id = Uuid::nil();
        assert_eq!(
            product_detail_key(id),
            "product-detail:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(product_list_key("LAPTOP"), "product-list:laptop");
        assert!(pattern_matches(&product_list_pattern(), &product_list_key("pc")));
    }

    #[test]
    fn test_catalog_query_keys_share_listing_pattern() {
        let search = ProductSearch {
            price: PriceRange::new(Some(100), None).unwrap(),
            sort: PriceSort::PriceDesc,
            page: Page::new(2, 20).unwrap(),
        };
        assert_eq!(
            product_search_key(&search),
            "product-list:price:100:any:price_desc:2:20"
        );
        assert_eq!(
            product_count_key(&search.price),
            "product-list:count:100:any"
        );
        assert_eq!(product_list_all_key(), "product-list:all:items");
        assert_ne!(product_list_all_key(), product_list_key("all"));

        let pattern = product_list_pattern();
        for key in [
            product_list_all_key(),
            product_search_key(&search),
            product_count_key(&search.price),
        ] {
            assert!(pattern_matches(&pattern, &key));
        }
    }

    #[test]
    fn test_cart_keys_share_pattern() {
        let pattern = cart_pattern("user123");
        assert_eq!(pattern, "cart:user123:*");
        assert!(pattern_matches(&pattern, &cart_items_key("user123")));
        assert!(pattern_matches(&pattern, &cart_count_key("user123")));
        assert!(!pattern_matches(&pattern, &cart_items_key("user1234")));
    }

    #[test]
    fn test_order_user_key_qualifiers() {
        assert_eq!(order_user_key("u1", None), "order-user:u1:all");
        assert_eq!(order_user_key("u1", Some("")), "order-user:u1:all");
        assert_eq!(order_user_key("u1", Some("shipped")), "order-user:u1:shipped");
    }

    #[test]
    fn test_order_user_pattern_excludes_detail_keys() {
        let pattern = order_user_pattern("u1");
        assert!(pattern_matches(&pattern, &order_user_key("u1", Some("pending"))));
        assert!(!pattern_matches(&pattern, &order_detail_key("u1")));
        assert!(!pattern_matches(&pattern, &order_user_key("u2", None)));
    }
}
