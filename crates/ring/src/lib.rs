//! Consistent hashing for peer selection
//!
//! Each physical node is placed on a 32-bit ring at `replicas` virtual
//! positions, `hash(i.to_string() + node)` for `i` in `0..replicas`. A key is
//! owned by the node at the first position clockwise from `hash(key)`,
//! wrapping past the top of the ring. Adding a node only moves the keys that
//! now land on one of its new positions.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// Hash function mapping bytes onto the ring
pub type HashFn = Arc<dyn Fn(&[u8]) -> u32 + Send + Sync>;

/// Default ring hash: CRC-32C
pub fn default_hash(data: &[u8]) -> u32 {
    crc32c::crc32c(data)
}

/// Virtual-node hash ring mapping keys to node identifiers.
///
/// Mutation goes through `&mut self`; share a ring between threads by wrapping
/// it in a lock.
#[derive(Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Virtual node positions, always sorted ascending
    positions: Vec<u32>,
    /// Position to physical node
    owners: HashMap<u32, String>,
}

impl HashRing {
    /// Create a ring hashing with [`default_hash`]
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, Arc::new(default_hash))
    }

    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            positions: Vec::new(),
            owners: HashMap::new(),
        }
    }

    /// Place each node at `replicas` positions on the ring.
    ///
    /// The whole position list is re-sorted once per call, so building a ring
    /// costs O(n log n) per batch. Membership changes are expected to be rare.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let position = (self.hash)(format!("{i}{node}").as_bytes());
                self.positions.push(position);
                self.owners.insert(position, node.to_string());
            }
            tracing::debug!(node, replicas = self.replicas, "added node to hash ring");
        }
        self.positions.sort_unstable();
    }

    /// The node owning `key`, or `None` when the ring is empty
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.positions.partition_point(|&position| position < hash);
        let position = self.positions[idx % self.positions.len()];
        self.owners.get(&position).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of virtual positions on the ring
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Distinct physical nodes, sorted
    pub fn nodes(&self) -> Vec<&str> {
        self.owners
            .values()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("positions", &self.positions.len())
            .field("nodes", &self.nodes())
            .finish()
    }
}
