//! Injectable series cache.
//!
//! The fetcher consults a [`SeriesCache`] collaborator keyed by
//! `(ticker, period, interval)`; it does not own cache storage and there is
//! no process-wide singleton. Concurrent refreshes for the same key may
//! race; last-write-wins is acceptable and costs at most one extra fetch.

use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use crate::models::series::OhlcSeries;

/// A get/set capability for caching fetched series with a TTL.
pub trait SeriesCache: Send + Sync {
    /// Returns the cached series for `key` if present and not expired.
    fn get(&self, key: &str) -> Option<OhlcSeries>;

    /// Stores `series` under `key` for at most `ttl`.
    fn set(&self, key: &str, series: OhlcSeries, ttl: Duration);
}

struct CacheEntry {
    series: OhlcSeries,
    expires_at: Instant,
}

/// Mutex-guarded in-memory TTL cache.
///
/// Expired entries are evicted lazily on lookup.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.entries.lock().expect("cache lock poisoned").clear();
    }
}

impl SeriesCache for MemoryCache {
    fn get(&self, key: &str) -> Option<OhlcSeries> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.series.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, series: OhlcSeries, ttl: Duration) {
        let entry = CacheEntry {
            series,
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .insert(key.to_string(), entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(symbol: &str) -> OhlcSeries {
        OhlcSeries::empty(symbol)
    }

    #[test]
    fn set_then_get_roundtrip() {
        let cache = MemoryCache::new();
        cache.set("k", series("A"), Duration::from_secs(60));
        assert_eq!(cache.get("k").unwrap().symbol, "A");
    }

    #[test]
    fn expired_entries_are_evicted() {
        let cache = MemoryCache::new();
        cache.set("k", series("A"), Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn overwrite_wins() {
        let cache = MemoryCache::new();
        cache.set("k", series("A"), Duration::from_secs(60));
        cache.set("k", series("B"), Duration::from_secs(60));
        assert_eq!(cache.get("k").unwrap().symbol, "B");
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = MemoryCache::new();
        cache.set("k", series("A"), Duration::from_secs(60));
        cache.clear();
        assert!(cache.get("k").is_none());
    }
}
