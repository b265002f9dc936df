//! Error types for meshcache operations

mod builders;
mod types;

pub use types::{BoxError, Error, Result, SharedError};
