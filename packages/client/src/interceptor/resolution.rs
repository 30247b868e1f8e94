//! Outcome of a single resolution

use crate::http::CacheResponse;

/// Where the response handed back to the caller came from
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Fresh stored entry; a background refresh was scheduled
    Fresh(CacheResponse),
    /// Preload response, now stored
    Preloaded(CacheResponse),
    /// Network response, stored when storable
    Network(CacheResponse),
    /// Network failed; stale stored entry served as last resort
    Stale(CacheResponse),
    /// Network failed; stored offline fallback document served
    Fallback(CacheResponse),
    /// Network failed with nothing stored
    Synthetic(CacheResponse),
}

impl Resolution {
    #[must_use]
    pub fn response(&self) -> &CacheResponse {
        match self {
            Resolution::Fresh(r)
            | Resolution::Preloaded(r)
            | Resolution::Network(r)
            | Resolution::Stale(r)
            | Resolution::Fallback(r)
            | Resolution::Synthetic(r) => r,
        }
    }

    #[must_use]
    pub fn into_response(self) -> CacheResponse {
        match self {
            Resolution::Fresh(r)
            | Resolution::Preloaded(r)
            | Resolution::Network(r)
            | Resolution::Stale(r)
            | Resolution::Fallback(r)
            | Resolution::Synthetic(r) => r,
        }
    }

    /// Answered from the store without reaching the origin
    #[must_use]
    pub fn is_from_cache(&self) -> bool {
        matches!(
            self,
            Resolution::Fresh(_) | Resolution::Stale(_) | Resolution::Fallback(_)
        )
    }

    /// Short label for logs and metrics
    #[must_use]
    pub fn source(&self) -> &'static str {
        match self {
            Resolution::Fresh(_) => "fresh",
            Resolution::Preloaded(_) => "preload",
            Resolution::Network(_) => "network",
            Resolution::Stale(_) => "stale",
            Resolution::Fallback(_) => "fallback",
            Resolution::Synthetic(_) => "synthetic",
        }
    }
}
