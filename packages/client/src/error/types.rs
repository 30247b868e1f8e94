use std::fmt;

use crate::config::ConfigurationError;

/// A Result alias where the Err case is `CacheError`.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Failures raised by the cache engine
///
/// Only `Storage` and `Seed` are meant to reach callers of the foreground
/// operations; network and preload failures are recovered inside the
/// interception controller.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The underlying store is unusable
    #[error("cache storage for generation `{generation}` is unusable: {source}")]
    Storage {
        generation: String,
        #[source]
        source: std::io::Error,
    },

    /// Transport failure or timeout
    #[error("network request for {url} failed ({kind}): {message}")]
    Network {
        url: String,
        kind: NetworkErrorKind,
        message: String,
    },

    /// The preload source rejected or resolved empty
    #[error("preload response unavailable: {0}")]
    Preload(String),

    /// One or more seed fetches failed during install
    #[error("seeding failed for {count} resource(s): {summary}", count = .failed.len(), summary = SeedFailure::summary(.failed))]
    Seed { failed: Vec<SeedFailure> },

    /// A request could not be constructed
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Config(#[from] ConfigurationError),
}

/// Classification of transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// Connection could not be established
    Connect,
    /// No complete response within the transport timeout
    Timeout,
    /// Connection established but the exchange failed
    Protocol,
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkErrorKind::Connect => f.write_str("connect"),
            NetworkErrorKind::Timeout => f.write_str("timeout"),
            NetworkErrorKind::Protocol => f.write_str("protocol"),
        }
    }
}

/// A single seed resource that could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFailure {
    pub url: String,
    pub reason: String,
}

impl SeedFailure {
    fn summary(failed: &[SeedFailure]) -> String {
        failed
            .iter()
            .map(|f| format!("{} ({})", f.url, f.reason))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
