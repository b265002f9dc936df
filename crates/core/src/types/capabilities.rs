//! Capabilities the embedding application supplies to the cache core.
//!
//! The core never talks to a database or a network on its own. It calls a
//! [`DataSource`] on a local miss and, when the key belongs to another node,
//! asks a [`PeerPicker`] for a [`PeerGetter`] to fetch through. How a peer is
//! reached (HTTP, gRPC, in-process) is entirely up to the implementation.

use super::byte_view::ByteView;
use crate::errors::BoxError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The authoritative source of values, consulted on a local miss
pub trait DataSource: Send + Sync {
    /// Load the value for `key`
    fn get(&self, key: &str) -> Result<Vec<u8>, BoxError>;
}

/// Adapter that turns a closure into a [`DataSource`]
pub struct DataSourceFn<F>(F);

impl<F> DataSourceFn<F>
where
    F: Fn(&str) -> Result<Vec<u8>, BoxError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> DataSource for DataSourceFn<F>
where
    F: Fn(&str) -> Result<Vec<u8>, BoxError> + Send + Sync,
{
    fn get(&self, key: &str) -> Result<Vec<u8>, BoxError> {
        (self.0)(key)
    }
}

impl<F> fmt::Debug for DataSourceFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DataSourceFn")
    }
}

/// A request for one key of one group, sent to the peer that owns the key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub group: String,
    pub key: String,
}

impl FetchRequest {
    pub fn new(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
        }
    }
}

/// The owning peer's answer to a [`FetchRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub value: Vec<u8>,
}

impl FetchResponse {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Fetches values from a remote peer
pub trait PeerGetter: Send + Sync {
    fn get(&self, request: &FetchRequest) -> Result<FetchResponse, BoxError>;
}

/// Selects the peer that owns a key.
///
/// Returns `None` when no peer is known or when the local node owns the key,
/// in which case the caller loads locally.
pub trait PeerPicker: Send + Sync {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

/// Invoked with each entry a bounded cache evicts.
///
/// Runs synchronously while the cache's lock is held. It must not call back
/// into the same cache; doing so deadlocks.
pub type EvictionCallback = Arc<dyn Fn(&str, &ByteView) + Send + Sync>;
