//! Short-lived value cache with sliding expiration.
//!
//! Entries stay valid while `now - timestamp < ttl`. Every successful read
//! bumps the timestamp, so a key polled more often than the TTL never expires.
//! Expired entries are dropped on the read that finds them.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Source of the current time for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by `Instant::now()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when advanced. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    timestamp: Instant,
}

/// Thread-safe map whose entries expire `ttl` after their last access.
///
/// Concurrent writers to the same key are last-write-wins.
#[derive(Debug)]
pub struct TtlCache<K, V, C = SystemClock> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    clock: C,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V, SystemClock> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K: Eq + Hash, V: Clone, C: Clock> TtlCache<K, V, C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the value for `key` if it has not expired, refreshing its timestamp.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let now = self.clock.now();
        let mut entries = self.lock();
        if let Some(entry) = entries.get_mut(key) {
            if now.saturating_duration_since(entry.timestamp) < self.ttl {
                entry.timestamp = now;
                return Some(entry.value.clone());
            }
        }
        entries.remove(key);
        None
    }

    /// Stores `value` under `key`, stamped with the current time.
    pub fn insert(&self, key: K, value: V) {
        let timestamp = self.clock.now();
        self.lock().insert(key, CacheEntry { value, timestamp });
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.lock().remove(key).map(|entry| entry.value)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(ttl_ms: u64) -> (TtlCache<String, u32, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let cache = TtlCache::with_clock(Duration::from_millis(ttl_ms), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_hit_before_expiry() {
        let (cache, clock) = cache(2000);
        cache.insert("WidgetInc".to_string(), 7);

        clock.advance(Duration::from_millis(1900));
        assert_eq!(cache.get("WidgetInc"), Some(7));
    }

    #[test]
    fn test_miss_after_expiry() {
        let (cache, clock) = cache(2000);
        cache.insert("WidgetInc".to_string(), 7);

        clock.advance(Duration::from_millis(2100));
        assert_eq!(cache.get("WidgetInc"), None);
        // Expired entry is dropped on read
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expires_exactly_at_ttl() {
        let (cache, clock) = cache(2000);
        cache.insert("a".to_string(), 1);

        clock.advance(Duration::from_millis(2000));
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_access_slides_expiry() {
        let (cache, clock) = cache(2000);
        cache.insert("a".to_string(), 1);

        // Each hit pushes expiry out by another TTL
        for _ in 0..5 {
            clock.advance(Duration::from_millis(1500));
            assert_eq!(cache.get("a"), Some(1));
        }

        clock.advance(Duration::from_millis(2001));
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_insert_replaces_value_and_timestamp() {
        let (cache, clock) = cache(1000);
        cache.insert("a".to_string(), 1);
        clock.advance(Duration::from_millis(900));
        cache.insert("a".to_string(), 2);
        clock.advance(Duration::from_millis(900));

        assert_eq!(cache.get("a"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let (cache, _clock) = cache(1000);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);

        assert_eq!(cache.remove("a"), Some(1));
        assert_eq!(cache.get("a"), None);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(TtlCache::<u32, u32>::new(Duration::from_secs(60)));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        cache.insert(i % 2, i);
                        let _ = cache.get(&(i % 2));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 2);
    }
}
