//! LRU (Least Recently Used) store bounded by total bytes

use ::lru::LruCache;
use meshcache_core::{ByteView, EvictionCallback};
use std::fmt;

/// Byte-budgeted LRU cache.
///
/// Usage is the sum of `key.len() + value.len()` over resident entries. After
/// every [`add`](Self::add), usage is at most `max_bytes` unless `max_bytes`
/// is 0, which disables the budget. Not synchronized; see
/// [`SynchronizedCache`](crate::SynchronizedCache).
pub struct BoundedCache {
    /// Recency order; entries are only ever popped explicitly
    entries: LruCache<String, ByteView>,
    /// Current usage in bytes
    used_bytes: u64,
    /// Budget in bytes, 0 for unbounded
    max_bytes: u64,
    on_evicted: Option<EvictionCallback>,
}

impl BoundedCache {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            entries: LruCache::unbounded(),
            used_bytes: 0,
            max_bytes,
            on_evicted: None,
        }
    }

    /// Create a cache that reports every evicted entry to `on_evicted`
    pub fn with_eviction_callback(max_bytes: u64, on_evicted: EvictionCallback) -> Self {
        Self {
            on_evicted: Some(on_evicted),
            ..Self::new(max_bytes)
        }
    }

    /// Look up `key`, promoting it to most recently used
    pub fn get(&mut self, key: &str) -> Option<ByteView> {
        self.entries.get(key).cloned()
    }

    /// Whether `key` is resident, without touching recency
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Insert or replace `key`, promote it, then evict down to the budget
    pub fn add(&mut self, key: impl Into<String>, value: ByteView) {
        let key = key.into();
        let added = value.len() as u64;

        match self.entries.get_mut(&key) {
            Some(existing) => {
                let replaced = existing.len() as u64;
                *existing = value;
                self.used_bytes = self.used_bytes + added - replaced;
            }
            None => {
                self.used_bytes += key.len() as u64 + added;
                self.entries.put(key, value);
            }
        }

        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            self.remove_oldest();
        }
    }

    /// Evict the least recently used entry, reporting it to the eviction callback
    pub fn remove_oldest(&mut self) -> Option<(String, ByteView)> {
        let (key, value) = self.entries.pop_lru()?;
        self.used_bytes -= entry_size(&key, &value);
        tracing::trace!(key = %key, bytes = value.len(), "evicted cache entry");

        if let Some(on_evicted) = &self.on_evicted {
            on_evicted(&key, &value);
        }
        Some((key, value))
    }

    /// Delete `key` without reporting it as an eviction
    pub fn remove(&mut self, key: &str) -> Option<ByteView> {
        let value = self.entries.pop(key)?;
        self.used_bytes -= entry_size(key, &value);
        Some(value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.used_bytes = 0;
    }

    /// Number of resident entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes currently charged against the budget
    pub fn bytes(&self) -> u64 {
        self.used_bytes
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

impl fmt::Debug for BoundedCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache")
            .field("len", &self.entries.len())
            .field("used_bytes", &self.used_bytes)
            .field("max_bytes", &self.max_bytes)
            .field("has_eviction_callback", &self.on_evicted.is_some())
            .finish()
    }
}

fn entry_size(key: &str, value: &ByteView) -> u64 {
    (key.len() + value.len()) as u64
}
