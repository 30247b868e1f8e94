//! Request cache policy
//!
//! Decides once per request whether the caller is willing to be answered
//! from the store at all.

use crate::http::headers::pragma_no_cache;
use crate::http::{CacheControl, CacheRequest, RequestCacheMode};

/// The caller's stance on stored responses for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestCachePreference {
    /// Stored responses may be used when fresh
    AllowCache,
    /// Caller forced revalidation; go to preload or network
    BypassCache,
}

impl RequestCachePreference {
    /// Derive the preference from the request's cache mode and headers
    #[must_use]
    pub fn of(request: &CacheRequest) -> Self {
        if accepts_cache(request) {
            Self::AllowCache
        } else {
            Self::BypassCache
        }
    }

    #[must_use]
    pub fn allows_cache(self) -> bool {
        self == Self::AllowCache
    }
}

/// True unless the caller explicitly asked for network-sourced data
///
/// Bypass signals: a non-default cache mode, `Cache-Control: no-cache`,
/// `no-store` or `max-age=0`, or `Pragma: no-cache` when no
/// `Cache-Control` header is present.
#[must_use]
pub fn accepts_cache(request: &CacheRequest) -> bool {
    if request.mode() != RequestCacheMode::Default {
        return false;
    }

    match CacheControl::from_headers(request.headers()) {
        Some(cc) => !cc.forbids_reuse() && cc.max_age != Some(0),
        None => !pragma_no_cache(request.headers()),
    }
}
