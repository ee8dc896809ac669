/// Read-through caching for async lookups.
///
/// Returns the cached value when present. Otherwise awaits `$block`,
/// propagates its error with `?`, schedules a background cache write and
/// returns the fresh value wrapped in `Ok`.
///
/// `$cache` must expose `get_from_cache` and `set_in_background`.
///
/// # Example
/// ```rust,ignore
/// let details: MovieDetails = cached!(self.cache, CacheKey::MovieDetails(id), TTL, async move {
///     self.fetch_details(id).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_from_cache(&key).await {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
