//! Byte-budgeted LRU eviction
//!
//! Entries are charged `key.len() + value.len()` bytes. Whenever an insert
//! pushes usage over the budget, least-recently-used entries are evicted until
//! it fits again.

mod lru;

pub use self::lru::BoundedCache;
