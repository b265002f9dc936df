//! Core error type definitions

use std::sync::Arc;

/// Result type alias for meshcache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by application-supplied capabilities
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared form of a capability error, so one failure can be handed to every
/// caller coalesced onto the same load.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync>;

/// Core error type for meshcache operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A lookup was attempted with an empty key
    #[error("key is required")]
    EmptyKey,

    /// A group was built without a data source
    #[error("group '{group}' requires a data source")]
    MissingDataSource { group: String },

    /// A peer picker was registered on a group that already has one
    #[error("peers already registered for group '{group}'")]
    PeersAlreadyRegistered { group: String },

    /// A group name was registered twice in the same registry
    #[error("group '{name}' is already registered")]
    DuplicateGroup { name: String },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Remote fetch from the owning peer failed
    #[error("failed to fetch '{key}' for group '{group}' from peer: {source}")]
    PeerFetch {
        group: String,
        key: String,
        #[source]
        source: SharedError,
    },

    /// The data source failed to produce a value
    #[error("data source failed to load '{key}' for group '{group}': {source}")]
    DataSource {
        group: String,
        key: String,
        #[source]
        source: SharedError,
    },
}
