//! Glob matching for cache key patterns.
//!
//! Only `*` is special: it matches any run of characters, including an
//! empty one. This is the subset of Redis `MATCH` syntax the services use,
//! so the in-memory backend and Redis agree on what a pattern deletes.

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use storefront_core::cache::pattern_matches;
///
/// assert!(pattern_matches("cart:user123:*", "cart:user123:items"));
/// assert!(pattern_matches("order-user:*:pending", "order-user:u1:pending"));
/// assert!(!pattern_matches("cart:user123:*", "cart:user456:items"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let pattern = pattern.as_bytes();
    let key = key.as_bytes();

    let (mut p, mut k) = (0, 0);
    // Position of the last `*` seen and the key index it is currently absorbing up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while k < key.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            backtrack = Some((p, k));
            p += 1;
        } else if p < pattern.len() && pattern[p] == key[k] {
            p += 1;
            k += 1;
        } else if let Some((star, absorbed)) = backtrack {
            p = star + 1;
            k = absorbed + 1;
            backtrack = Some((star, k));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == b'*')
}
