//! meshcache: an embeddable distributed cache
//!
//! Each process keeps a bounded local cache per [`Group`]. On a miss the key
//! is either fetched from the peer that owns it (chosen by a [`PeerPicker`],
//! usually a [`RingPeerPicker`]) or loaded from the group's [`DataSource`].
//! Concurrent misses for the same key share a single load.
//!
//! ```
//! use meshcache::{BoxError, Group, GroupRegistry};
//!
//! let registry = GroupRegistry::new();
//! let scores = registry
//!     .register_builder(
//!         Group::builder("scores")
//!             .cache_bytes(2 << 10)
//!             .data_source_fn(|key: &str| -> Result<Vec<u8>, BoxError> {
//!                 match key {
//!                     "Tom" => Ok(b"630".to_vec()),
//!                     _ => Err(format!("{key} not exist").into()),
//!                 }
//!             }),
//!     )
//!     .unwrap();
//!
//! assert_eq!(scores.get("Tom").unwrap().to_string(), "630");
//! assert!(scores.get("Sam").is_err());
//! ```
//!
//! The network transport between peers is not part of this crate: implement
//! [`PeerGetter`] on top of whatever RPC layer the deployment uses.

pub mod coalesce;
pub mod group;
pub mod picker;
pub mod registry;
pub mod stats;

pub use coalesce::CallCoalescer;
pub use group::{Group, GroupBuilder};
pub use picker::RingPeerPicker;
pub use registry::GroupRegistry;
pub use stats::{GroupStats, StatsSnapshot};

pub use meshcache_cache::{BoundedCache, SynchronizedCache};
pub use meshcache_core::{
    BoxError, ByteView, CacheConfig, CacheConfigBuilder, DataSource, DataSourceFn, Error,
    EvictionCallback, FetchRequest, FetchResponse, PeerGetter, PeerPicker, Result,
};
pub use meshcache_ring::{HashFn, HashRing};
