//! Core domain types, errors, and capability traits for `meshcache`.
//!
//! Every other crate in the workspace builds on the items defined here.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum and `Result` alias shared by the whole
//!   get-or-load pipeline.
//! - **`types`**: `ByteView`, the immutable value type handed out by caches,
//!   and the capability traits (`DataSource`, `PeerPicker`, `PeerGetter`) the
//!   embedding application implements.
//! - **`config`**: `CacheConfig` with serde loading and environment overrides.
//! - **`constants`**: environment variable names and defaults.

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    config::{CacheConfig, CacheConfigBuilder},
    constants::*,
    errors::{BoxError, Error, Result},
    types::*,
};
