/// Read-through caching over Redis.
///
/// Checks the cache for the given key and returns the hit if present;
/// otherwise runs the block, stores the result in the background, and
/// returns it.
///
/// # Arguments
/// * `$cache`: cache instance providing `get_from_cache` and
///   `set_in_background`.
/// * `$key`: the `CacheKey` under which the value lives.
/// * `$ttl`: time-to-live in seconds for a freshly computed value.
/// * `$block`: async block computing the value on a miss.
///
/// # Example
/// ```ignore
/// let page = cached!(cache, CacheKey::PopularMovies(1), 1800, async move {
///     fetch_popular_page(1)
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
