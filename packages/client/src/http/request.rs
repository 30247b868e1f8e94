//! Intercepted request representation

use http::{HeaderMap, HeaderName, HeaderValue, Method, header};
use url::Url;

use crate::error::{self, Result};

/// Request cache mode as set by the originator of a request
///
/// Mirrors the fetch-standard `Request.cache` attribute. Every mode other
/// than `Default` asks for network-sourced data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestCacheMode {
    #[default]
    Default,
    /// Revalidate with the origin before using any stored response
    NoCache,
    /// Ignore stored responses and refresh them from the origin
    Reload,
    /// Neither read from nor meaningfully rely on the store
    NoStore,
}

/// A request intercepted on its way to the origin
#[derive(Debug, Clone)]
pub struct CacheRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    cache_mode: RequestCacheMode,
}

impl CacheRequest {
    /// Create a request for `url` with the given method
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            cache_mode: RequestCacheMode::Default,
        }
    }

    /// Create a GET request for `url`
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Parse `url` and create a request for it
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidRequest` if `url` is not an absolute URL.
    pub fn parse(method: Method, url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| error::invalid_request(format!("invalid request URL `{url}`: {e}")))?;
        Ok(Self::new(method, url))
    }

    /// Add a header, replacing any previous value with the same name
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the request cache mode
    #[must_use]
    pub fn cache_mode(mut self, mode: RequestCacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn mode(&self) -> RequestCacheMode {
        self.cache_mode
    }

    /// Header value as a string, if present and valid ASCII
    #[must_use]
    pub fn header_str(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Whether the originator will accept an HTML document, i.e. a navigation
    #[must_use]
    pub fn accepts_html(&self) -> bool {
        self.header_str(&header::ACCEPT)
            .is_some_and(|accept| accept.to_ascii_lowercase().contains("text/html"))
    }
}
