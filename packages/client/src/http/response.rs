//! Materialized HTTP response snapshot
//!
//! `CacheResponse` is what the store keeps and what the controller hands
//! back to the caller. Cloning is cheap: the body is reference counted.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use url::Url;

/// Status used for the synthetic response returned when neither the network
/// nor the store can answer a request
pub const NETWORK_ERROR_STATUS: StatusCode = StatusCode::REQUEST_TIMEOUT;

/// Body of the synthetic network-error response
pub const NETWORK_ERROR_BODY: &str = "Network error happened";

/// HTTP response with status, headers and a fully buffered body
#[derive(Debug, Clone, PartialEq)]
pub struct CacheResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    url: Option<Url>,
    redirected: bool,
}

impl CacheResponse {
    /// Create an empty response with the given status
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            url: None,
            redirected: false,
        }
    }

    /// Assemble a response from already-received parts
    #[must_use]
    pub fn from_parts(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
            url: None,
            redirected: false,
        }
    }

    /// Synthetic response presented when the origin is unreachable and no
    /// stored copy exists
    #[must_use]
    pub fn network_error() -> Self {
        Self::new(NETWORK_ERROR_STATUS)
            .header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .body(Bytes::from_static(NETWORK_ERROR_BODY.as_bytes()))
    }

    /// Add a header, replacing any previous value with the same name
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Record the final URL the response was served from
    #[must_use]
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// Mark the response as the product of one or more redirects
    #[must_use]
    pub fn redirected(mut self, redirected: bool) -> Self {
        self.redirected = redirected;
        self
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    #[must_use]
    pub fn is_redirected(&self) -> bool {
        self.redirected
    }

    /// Header value as a string, if present and valid ASCII
    #[must_use]
    pub fn header_str(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body as UTF-8 text, if it is valid UTF-8
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Status is in the 2xx range
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Whether this is the synthetic network-error response
    #[must_use]
    pub fn is_network_error(&self) -> bool {
        self.status == NETWORK_ERROR_STATUS
            && self.url.is_none()
            && self.body.as_ref() == NETWORK_ERROR_BODY.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_is_plain_text_and_not_success() {
        let response = CacheResponse::network_error();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(!response.is_success());
        assert_eq!(response.header_str(&header::CONTENT_TYPE), Some("text/plain"));
        assert_eq!(response.text(), Some("Network error happened"));
        assert!(response.is_network_error());
    }

    #[test]
    fn origin_408_is_not_mistaken_for_synthetic() {
        let url = Url::parse("http://localhost:8000/slow").unwrap();
        let response = CacheResponse::new(StatusCode::REQUEST_TIMEOUT)
            .body("upstream timed out")
            .with_url(url);

        assert!(!response.is_network_error());
    }
}
