//! Thread-safe access to a group's local cache
//!
//! A single mutex guards both reads and writes: a hit promotes the entry,
//! which mutates the recency list.

use crate::eviction::BoundedCache;
use meshcache_core::{ByteView, EvictionCallback};
use parking_lot::Mutex;

/// Mutex-guarded [`BoundedCache`] that is only allocated on first write.
///
/// A node that never ends up owning a key for its group never allocates the
/// underlying store.
pub struct SynchronizedCache {
    inner: Mutex<Option<BoundedCache>>,
    max_bytes: u64,
    on_evicted: Option<EvictionCallback>,
}

impl SynchronizedCache {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            inner: Mutex::new(None),
            max_bytes,
            on_evicted: None,
        }
    }

    /// The callback is handed to the underlying cache when it is allocated.
    /// It runs with this cache's lock held and must not call back into it.
    pub fn with_eviction_callback(max_bytes: u64, on_evicted: EvictionCallback) -> Self {
        Self {
            on_evicted: Some(on_evicted),
            ..Self::new(max_bytes)
        }
    }

    pub fn get(&self, key: &str) -> Option<ByteView> {
        self.inner.lock().as_mut()?.get(key)
    }

    pub fn add(&self, key: impl Into<String>, value: ByteView) {
        let mut inner = self.inner.lock();
        let cache = inner.get_or_insert_with(|| {
            tracing::debug!(max_bytes = self.max_bytes, "allocating local cache");
            match &self.on_evicted {
                Some(on_evicted) => {
                    BoundedCache::with_eviction_callback(self.max_bytes, on_evicted.clone())
                }
                None => BoundedCache::new(self.max_bytes),
            }
        });
        cache.add(key, value);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, BoundedCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes currently charged against the budget
    pub fn bytes(&self) -> u64 {
        self.inner.lock().as_ref().map_or(0, BoundedCache::bytes)
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Whether the underlying cache has been allocated yet
    pub fn is_initialized(&self) -> bool {
        self.inner.lock().is_some()
    }
}

impl std::fmt::Debug for SynchronizedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynchronizedCache")
            .field("max_bytes", &self.max_bytes)
            .field("len", &self.len())
            .finish()
    }
}
