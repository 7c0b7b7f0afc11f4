use storefront_core::cache::CacheError;

/// Sorts a Redis failure into "server unreachable" or "command failed".
///
/// The distinction only shows up in logs; the cache-aside layer treats both
/// as a miss.
pub fn map_redis_error(err: redis::RedisError) -> CacheError {
    let unreachable =
        err.is_connection_refusal() || err.is_connection_dropped() || err.is_timeout();
    let detail = format!("{err} ({:?})", err.kind());
    if unreachable {
        CacheError::ConnectionFailed(detail)
    } else {
        CacheError::OperationFailed(detail)
    }
}
