//! Cache groups: the get-or-load pipeline
//!
//! ```text
//! get(key) --> local cache hit? --yes--> return value
//!                  | no
//!                  +--> coalesce --> owned by a peer? --yes--> fetch from peer
//!                                        | no, or the fetch failed
//!                                        +--> data source --> populate cache
//! ```

use crate::coalesce::CallCoalescer;
use crate::stats::{GroupStats, StatsSnapshot};
use meshcache_cache::SynchronizedCache;
use meshcache_core::{
    BoxError, ByteView, CacheConfig, DataSource, DataSourceFn, Error, EvictionCallback,
    FetchRequest, PeerGetter, PeerPicker, Result,
};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// A named cache namespace backed by one data source.
///
/// Keys that belong to another node (as decided by the registered
/// [`PeerPicker`]) are fetched from that node and not cached here; everything
/// else is loaded from the data source and kept in the local cache.
pub struct Group {
    name: String,
    data_source: Arc<dyn DataSource>,
    main_cache: SynchronizedCache,
    peers: OnceCell<Arc<dyn PeerPicker>>,
    loader: CallCoalescer<Result<ByteView>>,
    stats: GroupStats,
}

impl Group {
    pub fn new(
        name: impl Into<String>,
        cache_bytes: u64,
        data_source: Arc<dyn DataSource>,
    ) -> Self {
        Self::from_parts(name.into(), SynchronizedCache::new(cache_bytes), data_source)
    }

    pub fn builder(name: impl Into<String>) -> GroupBuilder {
        GroupBuilder::new(name)
    }

    fn from_parts(
        name: String,
        main_cache: SynchronizedCache,
        data_source: Arc<dyn DataSource>,
    ) -> Self {
        Self {
            name,
            data_source,
            main_cache,
            peers: OnceCell::new(),
            loader: CallCoalescer::new(),
            stats: GroupStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register the peer picker used to route keys to their owners.
    ///
    /// A group takes exactly one picker; a second registration is rejected and
    /// the first picker stays in effect.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers
            .set(peers)
            .map_err(|_| Error::peers_already_registered(&self.name))
    }

    /// Get the value for `key`, loading it on a miss
    pub fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        GroupStats::record(&self.stats.gets);

        if let Some(value) = self.main_cache.get(key) {
            GroupStats::record(&self.stats.cache_hits);
            debug!(group = %self.name, key, "cache hit");
            return Ok(value);
        }

        self.load(key)
    }

    fn load(&self, key: &str) -> Result<ByteView> {
        GroupStats::record(&self.stats.loads);
        self.loader.execute(key, || {
            GroupStats::record(&self.stats.loads_executed);

            if let Some(peer) = self.peers.get().and_then(|picker| picker.pick_peer(key)) {
                match self.get_from_peer(peer.as_ref(), key) {
                    Ok(value) => {
                        GroupStats::record(&self.stats.peer_loads);
                        return Ok(value);
                    }
                    Err(e) => {
                        GroupStats::record(&self.stats.peer_errors);
                        warn!(
                            group = %self.name,
                            key,
                            error = %e,
                            "failed to get from peer, loading locally"
                        );
                    }
                }
            }

            self.get_locally(key)
        })
    }

    fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let request = FetchRequest::new(&self.name, key);
        let response = peer
            .get(&request)
            .map_err(|e| Error::peer_fetch(&self.name, key, e))?;
        Ok(ByteView::new(response.value))
    }

    fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = match self.data_source.get(key) {
            Ok(bytes) => bytes,
            Err(e) => {
                GroupStats::record(&self.stats.local_load_errors);
                return Err(Error::data_source(&self.name, key, e));
            }
        };
        GroupStats::record(&self.stats.local_loads);
        debug!(group = %self.name, key, bytes = bytes.len(), "loaded from data source");

        // The data source handed over its buffer, so nothing else aliases it
        let value = ByteView::new(bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Entries held in the local cache
    pub fn cache_len(&self) -> usize {
        self.main_cache.len()
    }

    /// Bytes held in the local cache
    pub fn cache_bytes(&self) -> u64 {
        self.main_cache.bytes()
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("main_cache", &self.main_cache)
            .field("has_peers", &self.peers.get().is_some())
            .finish()
    }
}

/// Builder for creating groups
pub struct GroupBuilder {
    name: String,
    cache_bytes: u64,
    data_source: Option<Arc<dyn DataSource>>,
    on_evicted: Option<EvictionCallback>,
}

impl GroupBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cache_bytes: CacheConfig::default().max_bytes,
            data_source: None,
            on_evicted: None,
        }
    }

    pub fn cache_bytes(mut self, cache_bytes: u64) -> Self {
        self.cache_bytes = cache_bytes;
        self
    }

    /// Take the cache budget from a loaded configuration
    pub fn config(mut self, config: &CacheConfig) -> Self {
        self.cache_bytes = config.max_bytes;
        self
    }

    pub fn data_source(mut self, data_source: Arc<dyn DataSource>) -> Self {
        self.data_source = Some(data_source);
        self
    }

    /// Use a closure as the data source
    pub fn data_source_fn<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<Vec<u8>, BoxError> + Send + Sync + 'static,
    {
        self.data_source(Arc::new(DataSourceFn::new(f)))
    }

    /// Observe entries evicted from the local cache. The callback runs under
    /// the cache lock and must not call back into the group.
    pub fn eviction_callback(mut self, on_evicted: EvictionCallback) -> Self {
        self.on_evicted = Some(on_evicted);
        self
    }

    pub fn build(self) -> Result<Group> {
        let data_source = self
            .data_source
            .ok_or_else(|| Error::missing_data_source(&self.name))?;
        let main_cache = match self.on_evicted {
            Some(on_evicted) => {
                SynchronizedCache::with_eviction_callback(self.cache_bytes, on_evicted)
            }
            None => SynchronizedCache::new(self.cache_bytes),
        };
        Ok(Group::from_parts(self.name, main_cache, data_source))
    }
}

impl fmt::Debug for GroupBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupBuilder")
            .field("name", &self.name)
            .field("cache_bytes", &self.cache_bytes)
            .field("has_data_source", &self.data_source.is_some())
            .finish()
    }
}
