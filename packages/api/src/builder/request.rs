//! Fluent construction of intercepted requests
//!
//! Provides methods for the request properties that steer resolution:
//! `Accept` (navigations get the offline fallback), `Cache-Control` and the
//! request cache mode (which can bypass stored entries).

use http::{HeaderName, HeaderValue, Method, header};
use swcache_client::http::{CacheRequest, RequestCacheMode};
use url::Url;

/// Accepted media types for navigations
pub const NAVIGATION_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Builder for a [`CacheRequest`]
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    request: CacheRequest,
}

impl RequestBuilder {
    /// Start a GET request for `url`
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self {
            request: CacheRequest::get(url),
        }
    }

    /// Start a request with an arbitrary method
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            request: CacheRequest::new(method, url),
        }
    }

    /// Add a custom header to the request
    ///
    /// # Arguments
    /// * `key` - The header name
    /// * `value` - The header value
    ///
    /// # Returns
    /// `Self` for method chaining
    #[must_use]
    pub fn header(mut self, key: HeaderName, value: HeaderValue) -> Self {
        self.request = self.request.header(key, value);
        self
    }

    /// Set the `Accept` header; invalid values are skipped
    #[must_use]
    pub fn accept(self, accept: &str) -> Self {
        match HeaderValue::from_str(accept) {
            Ok(value) => self.header(header::ACCEPT, value),
            Err(_) => {
                tracing::warn!(target: "swcache::builder", accept, "Invalid Accept value skipped");
                self
            }
        }
    }

    /// Mark the request as a document navigation
    ///
    /// Navigations are the only requests answered with the offline
    /// fallback document.
    #[must_use]
    pub fn navigation(self) -> Self {
        self.accept(NAVIGATION_ACCEPT)
    }

    /// Set the `Cache-Control` header
    ///
    /// # Arguments
    /// * `value` - The cache control directive (e.g., "no-cache", "max-age=0")
    ///
    /// # Returns
    /// `Self` for method chaining
    #[must_use]
    pub fn cache_control(self, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(header_value) => self.header(header::CACHE_CONTROL, header_value),
            Err(_) => self, // Skip invalid header value
        }
    }

    #[must_use]
    pub fn cache_mode(mut self, mode: RequestCacheMode) -> Self {
        self.request = self.request.cache_mode(mode);
        self
    }

    /// Skip stored entries for this request
    ///
    /// Resolution goes straight to preload or network; a stored entry is
    /// still used if both fail.
    #[must_use]
    pub fn bypass_cache(self) -> Self {
        self.cache_mode(RequestCacheMode::NoCache)
    }

    #[must_use]
    pub fn build(self) -> CacheRequest {
        self.request
    }
}

impl From<RequestBuilder> for CacheRequest {
    fn from(builder: RequestBuilder) -> Self {
        builder.build()
    }
}
