//! Freshness caching for loaded entities.
//!
//! [`TtlCache`] is a concurrent key/value store with lazy per-entry
//! expiration: `get` compares the entry's recorded deadline against the
//! current time and reports expired entries as misses. There is no background
//! sweeper; a stale entry is simply replaced by the next successful `insert`
//! for its key. Entries are never removed on read, so values handed out
//! earlier (and anything holding a non-owning reference into them) stay alive
//! for as long as the cache instance does.
//!
//! Only successful results belong in the cache. Callers must not insert
//! failures - a failed lookup stays eligible for immediate retry.
//!
//! Each entity kind gets its own independently keyed instance; see
//! [`crate::league::Loader`].

use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Key/value store whose entries expire a fixed duration after insertion.
pub struct TtlCache<K, V> {
    entries: DashMap<K, Entry<V>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Creates an empty cache whose entries live for `ttl` after insertion.
    pub fn new(ttl: Duration) -> Self {
        Self { entries: DashMap::new(), ttl }
    }

    /// Returns the value for `key` if present and not yet expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.entries.get(key)?;
        if Instant::now() > entry.expires_at {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Stores `value` under `key`, replacing any previous entry and resetting
    /// the expiration deadline.
    pub fn insert(&self, key: K, value: V) {
        let expires_at = Instant::now() + self.ttl;
        self.entries.insert(key, Entry { value, expires_at });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_on_absent_key() {
        let cache: TtlCache<u32, String> = TtlCache::new(Duration::from_secs(10));
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn hit_before_expiry() {
        let cache = TtlCache::new(Duration::from_secs(10));
        cache.insert(1, "fresh".to_string());
        assert_eq!(cache.get(&1).as_deref(), Some("fresh"));
    }

    #[test]
    fn miss_after_expiry() {
        let cache = TtlCache::new(Duration::from_millis(20));
        cache.insert(1, "stale".to_string());
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn insert_replaces_expired_entry() {
        let cache = TtlCache::new(Duration::from_millis(20));
        cache.insert(1, "old".to_string());
        std::thread::sleep(Duration::from_millis(40));
        cache.insert(1, "new".to_string());
        assert_eq!(cache.get(&1).as_deref(), Some("new"));
    }
}
