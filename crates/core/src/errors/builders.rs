//! Builder methods for creating errors with context

use super::types::{BoxError, Error};
use std::sync::Arc;

// Helper methods for creating errors with context
impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a missing data source error
    #[must_use]
    pub fn missing_data_source(group: impl Into<String>) -> Self {
        Error::MissingDataSource {
            group: group.into(),
        }
    }

    /// Create a duplicate peer registration error
    #[must_use]
    pub fn peers_already_registered(group: impl Into<String>) -> Self {
        Error::PeersAlreadyRegistered {
            group: group.into(),
        }
    }

    /// Create a duplicate group error
    #[must_use]
    pub fn duplicate_group(name: impl Into<String>) -> Self {
        Error::DuplicateGroup { name: name.into() }
    }

    /// Create a peer fetch error
    #[must_use]
    pub fn peer_fetch(group: impl Into<String>, key: impl Into<String>, source: BoxError) -> Self {
        Error::PeerFetch {
            group: group.into(),
            key: key.into(),
            source: Arc::from(source),
        }
    }

    /// Create a data source error
    #[must_use]
    pub fn data_source(group: impl Into<String>, key: impl Into<String>, source: BoxError) -> Self {
        Error::DataSource {
            group: group.into(),
            key: key.into(),
            source: Arc::from(source),
        }
    }

    /// Whether this error comes from misuse of the API rather than a failed load
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyKey
                | Error::MissingDataSource { .. }
                | Error::PeersAlreadyRegistered { .. }
                | Error::DuplicateGroup { .. }
                | Error::Configuration { .. }
        )
    }

    /// Whether this error is recovered locally by falling back to the data source
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Error::PeerFetch { .. })
    }

    /// The capability error carried by this error, for downcasting.
    ///
    /// `std::error::Error::source` yields the shared wrapper; this returns the
    /// error the application actually produced.
    #[must_use]
    pub fn capability_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::PeerFetch { source, .. } | Error::DataSource { source, .. } => {
                Some(source.as_ref())
            }
            _ => None,
        }
    }
}
