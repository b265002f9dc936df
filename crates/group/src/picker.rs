//! Hash-ring backed peer selection

use meshcache_core::{CacheConfig, PeerGetter, PeerPicker};
use meshcache_ring::{HashFn, HashRing};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

struct PeerSet {
    ring: HashRing,
    getters: HashMap<String, Arc<dyn PeerGetter>>,
}

/// A [`PeerPicker`] that routes each key to its owner on a consistent-hash ring.
///
/// The local node is always on the ring under `self_id`. Keys it owns yield
/// `None`, so the group loads them locally. The peer set can be replaced at
/// any time; lookups in progress see either the old or the new set.
pub struct RingPeerPicker {
    self_id: String,
    replicas: usize,
    hash: Option<HashFn>,
    peers: RwLock<PeerSet>,
}

impl RingPeerPicker {
    pub fn new(self_id: impl Into<String>, replicas: usize) -> Self {
        Self::build(self_id.into(), replicas, None)
    }

    pub fn from_config(self_id: impl Into<String>, config: &CacheConfig) -> Self {
        Self::new(self_id, config.replicas)
    }

    pub fn with_hasher(self_id: impl Into<String>, replicas: usize, hash: HashFn) -> Self {
        Self::build(self_id.into(), replicas, Some(hash))
    }

    fn build(self_id: String, replicas: usize, hash: Option<HashFn>) -> Self {
        let mut ring = new_ring(replicas, hash.as_ref());
        ring.add([self_id.as_str()]);
        Self {
            self_id,
            replicas,
            hash,
            peers: RwLock::new(PeerSet {
                ring,
                getters: HashMap::new(),
            }),
        }
    }

    pub fn self_id(&self) -> &str {
        &self.self_id
    }

    /// Replace the peer set, rebuilding the ring from scratch.
    ///
    /// An entry for `self_id` is ignored; the local node is always present.
    /// Node ids are placed on the ring in sorted order, so every node given
    /// the same membership builds the same ring, colliding positions included.
    pub fn set_peers<I>(&self, peers: I)
    where
        I: IntoIterator<Item = (String, Arc<dyn PeerGetter>)>,
    {
        let getters: HashMap<String, Arc<dyn PeerGetter>> = peers
            .into_iter()
            .filter(|(id, _)| *id != self.self_id)
            .collect();

        let members: BTreeSet<&str> = std::iter::once(self.self_id.as_str())
            .chain(getters.keys().map(String::as_str))
            .collect();
        let mut ring = new_ring(self.replicas, self.hash.as_ref());
        ring.add(members);

        tracing::debug!(node = %self.self_id, peers = getters.len(), "peer set updated");
        *self.peers.write() = PeerSet { ring, getters };
    }

    /// Identifier of the node that owns `key`, which may be this one
    pub fn owner_of(&self, key: &str) -> Option<String> {
        self.peers.read().ring.get(key).map(str::to_string)
    }

    /// Identifiers of every node on the ring, including this one
    pub fn nodes(&self) -> Vec<String> {
        self.peers
            .read()
            .ring
            .nodes()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

impl PeerPicker for RingPeerPicker {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let peers = self.peers.read();
        let owner = peers.ring.get(key)?;
        if owner == self.self_id {
            return None;
        }

        tracing::debug!(node = %self.self_id, peer = owner, key, "picked peer");
        peers.getters.get(owner).cloned()
    }
}

impl fmt::Debug for RingPeerPicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingPeerPicker")
            .field("self_id", &self.self_id)
            .field("replicas", &self.replicas)
            .field("ring", &self.peers.read().ring)
            .finish()
    }
}

fn new_ring(replicas: usize, hash: Option<&HashFn>) -> HashRing {
    match hash {
        Some(hash) => HashRing::with_hasher(replicas, Arc::clone(hash)),
        None => HashRing::new(replicas),
    }
}
