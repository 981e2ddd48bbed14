//! Explicit key/value cache with optional time-to-live and capacity.
//!
//! Callers own their cache and pass it where needed; there is no process-wide state.
//! Refresh is last-write-wins: inserting an existing key replaces the value and restarts
//! its lifetime.
use std::{
    hash::Hash,
    time::{Duration, Instant},
};

use ahash::AHashMap;

#[derive(Debug, Clone)]
struct Entry<V> {
    inserted: Instant,
    value: V,
}

/// Cache whose entries expire after `ttl` and whose size is bounded by `capacity`.
///
/// # Fields
///
/// * `ttl` - entry lifetime, `None` for entries that never expire
/// * `capacity` - maximum number of entries, the oldest one is evicted first
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    entries: AHashMap<K, Entry<V>>,
    ttl: Option<Duration>,
    capacity: Option<usize>,
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        TtlCache::new(None, None)
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(ttl: Option<Duration>, capacity: Option<usize>) -> Self {
        TtlCache {
            entries: AHashMap::new(),
            ttl,
            capacity,
        }
    }

    /// Cache whose entries expire after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        TtlCache::new(Some(ttl), None)
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn is_fresh(&self, entry: &Entry<V>, now: Instant) -> bool {
        self.ttl
            .is_none_or(|ttl| now.saturating_duration_since(entry.inserted) < ttl)
    }

    /// Value of `key` when present and not expired.
    pub fn get(&self, key: &K) -> Option<&V> {
        let now = Instant::now();
        self.entries
            .get(key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| &entry.value)
    }

    /// Value of `key` whether expired or not.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Insert or replace a value, evicting the oldest entry when the cache is full.
    pub fn insert(&mut self, key: K, value: V) {
        if let Some(capacity) = self.capacity {
            if !self.entries.contains_key(&key) && self.entries.len() >= capacity {
                let oldest = self
                    .entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    self.entries.remove(&oldest);
                }
            }
            if capacity == 0 {
                return;
            }
        }
        self.entries.insert(
            key,
            Entry {
                inserted: Instant::now(),
                value,
            },
        );
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// Drop every expired entry.
    pub fn purge_expired(&mut self) {
        let now = Instant::now();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| ttl.is_none_or(|ttl| now.saturating_duration_since(entry.inserted) < ttl));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod cache_test {
    use super::*;

    #[test]
    fn test_without_ttl() {
        let mut cache = TtlCache::default();
        cache.insert("2024 YR4".to_string(), 1);
        cache.insert("2024 YR4".to_string(), 2);
        assert_eq!(cache.get(&"2024 YR4".to_string()), Some(&2));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.remove(&"2024 YR4".to_string()), Some(2));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entries() {
        let mut cache = TtlCache::with_ttl(Duration::ZERO);
        cache.insert("recent", vec![1, 2]);
        assert_eq!(cache.get(&"recent"), None);
        assert_eq!(cache.peek(&"recent"), Some(&vec![1, 2]));
        cache.purge_expired();
        assert!(cache.is_empty());

        let mut cache = TtlCache::with_ttl(Duration::from_secs(3600));
        cache.insert("recent", vec![1, 2]);
        assert_eq!(cache.get(&"recent"), Some(&vec![1, 2]));
        cache.purge_expired();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut cache = TtlCache::new(None, Some(2));
        cache.insert(1, "a");
        std::thread::sleep(Duration::from_millis(2));
        cache.insert(2, "b");
        std::thread::sleep(Duration::from_millis(2));
        cache.insert(3, "c");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.get(&3), Some(&"c"));

        // replacing an existing key does not evict
        cache.insert(3, "d");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&2), Some(&"b"));

        let mut empty: TtlCache<i32, i32> = TtlCache::new(None, Some(0));
        empty.insert(1, 1);
        assert!(empty.is_empty());
    }
}
