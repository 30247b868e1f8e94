use std::time::Duration;

use url::Url;

use super::types::{CacheError, NetworkErrorKind, SeedFailure};

/// Creates a `CacheError` for an unusable store.
pub fn storage(generation: &str, source: std::io::Error) -> CacheError {
    CacheError::Storage {
        generation: generation.to_string(),
        source,
    }
}

/// Creates a `CacheError` for a failed network exchange.
pub fn network(url: &Url, kind: NetworkErrorKind, message: impl Into<String>) -> CacheError {
    CacheError::Network {
        url: url.to_string(),
        kind,
        message: message.into(),
    }
}

/// Creates a `CacheError` for a request that exceeded the transport timeout.
pub fn timeout(url: &Url, after: Duration) -> CacheError {
    network(
        url,
        NetworkErrorKind::Timeout,
        format!("no response within {}ms", after.as_millis()),
    )
}

/// Creates a `CacheError` for a missing or failed preload response.
pub fn preload(message: impl Into<String>) -> CacheError {
    CacheError::Preload(message.into())
}

/// Creates a `CacheError` for a malformed request.
pub fn invalid_request(message: impl Into<String>) -> CacheError {
    CacheError::InvalidRequest(message.into())
}

/// Creates the aggregate seeding failure.
pub fn seed(failed: Vec<SeedFailure>) -> CacheError {
    CacheError::Seed { failed }
}
