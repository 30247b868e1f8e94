//! Stored response entries
//!
//! An entry pairs the normalized request key with the response snapshot and
//! the instant it was written. Entries are immutable: a put replaces the
//! whole entry.

use std::time::SystemTime;

use http::header;

use super::cache_key::RequestKey;
use super::http_date::httpdate;
use crate::http::{CacheControl, CacheResponse};

/// Cached response entry with the metadata freshness depends on
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    key: RequestKey,
    response: CacheResponse,
    stored_at: SystemTime,
}

impl StoredEntry {
    #[must_use]
    pub fn new(key: RequestKey, response: CacheResponse, stored_at: SystemTime) -> Self {
        Self {
            key,
            response,
            stored_at,
        }
    }

    #[must_use]
    pub fn key(&self) -> &RequestKey {
        &self.key
    }

    #[must_use]
    pub fn response(&self) -> &CacheResponse {
        &self.response
    }

    #[must_use]
    pub fn into_response(self) -> CacheResponse {
        self.response
    }

    /// When the entry was written to the store
    #[must_use]
    pub fn stored_at(&self) -> SystemTime {
        self.stored_at
    }

    /// Origin's `Date` header, falling back to the write time
    #[must_use]
    pub fn response_timestamp(&self) -> SystemTime {
        self.response
            .header_str(&header::DATE)
            .and_then(|date| httpdate::parse_http_date(date).ok())
            .unwrap_or(self.stored_at)
    }

    /// Parsed `Cache-Control` directives, if the header is present
    #[must_use]
    pub fn cache_control(&self) -> Option<CacheControl> {
        CacheControl::from_headers(self.response.headers())
    }

    /// Explicit `Expires` instant, if present and a valid HTTP date
    #[must_use]
    pub fn expires(&self) -> Option<SystemTime> {
        self.response
            .header_str(&header::EXPIRES)
            .and_then(|expires| httpdate::parse_http_date(expires).ok())
    }

    /// Approximate memory footprint, body plus header overhead
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.response.bytes().len() as u64 + self.response.headers().len() as u64 * 64
    }
}
