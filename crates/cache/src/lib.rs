//! Local cache storage for meshcache
//!
//! This crate provides the two layers every group keeps its values in:
//! - [`BoundedCache`]: a byte-budgeted LRU store with an eviction callback
//! - [`SynchronizedCache`]: a lazily allocated, mutex-guarded wrapper around it

pub mod concurrent;
pub mod eviction;

pub use concurrent::SynchronizedCache;
pub use eviction::BoundedCache;
