use std::io;

use super::types::{CacheError, NetworkErrorKind};

impl CacheError {
    /// Returns true if the store could not be read or written.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(self, CacheError::Storage { .. })
    }

    /// Returns true if the error came from the network transport.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, CacheError::Network { .. })
    }

    /// Returns true if the error is related to a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            CacheError::Network { kind, .. } => *kind == NetworkErrorKind::Timeout,
            CacheError::Storage { source, .. } => source.kind() == io::ErrorKind::TimedOut,
            _ => false,
        }
    }

    /// Returns true if the error is related to connecting to the origin.
    #[must_use]
    pub fn is_connect(&self) -> bool {
        matches!(
            self,
            CacheError::Network {
                kind: NetworkErrorKind::Connect,
                ..
            }
        )
    }

    /// Returns true if no preload response was available.
    #[must_use]
    pub fn is_preload(&self) -> bool {
        matches!(self, CacheError::Preload(_))
    }

    /// Returns true if install-time seeding failed.
    #[must_use]
    pub fn is_seed(&self) -> bool {
        matches!(self, CacheError::Seed { .. })
    }

    /// Returns the network failure classification, if any.
    #[must_use]
    pub fn network_kind(&self) -> Option<NetworkErrorKind> {
        match self {
            CacheError::Network { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
