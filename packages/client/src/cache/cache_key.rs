//! Cache key normalization for intercepted requests
//!
//! A key is the request method plus its URL with the fragment removed. The
//! query string is kept separately so lookups can opt to ignore it.

use sha2::{Digest, Sha256};
use url::Url;

use crate::http::CacheRequest;

/// Lookup options for [`crate::cache::CacheStore::lookup`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Keys differing only by query string compare equal
    pub ignore_query: bool,
}

/// Normalized request identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    /// `METHOD scheme://host/path`, without query or fragment
    base: String,
    query: Option<String>,
}

impl RequestKey {
    /// Create key from request components
    #[must_use]
    pub fn new(method: &str, url: &Url) -> Self {
        let mut without_query = url.clone();
        without_query.set_fragment(None);
        let query = without_query.query().map(str::to_string);
        without_query.set_query(None);

        Self {
            base: format!("{} {}", method.to_ascii_uppercase(), without_query),
            query,
        }
    }

    /// Key for an intercepted request
    #[must_use]
    pub fn from_request(request: &CacheRequest) -> Self {
        Self::new(request.method().as_str(), request.url())
    }

    /// Reassemble a key read back from persisted storage
    pub(crate) fn from_parts(base: String, query: Option<String>) -> Self {
        Self { base, query }
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Full storage key, query included
    #[must_use]
    pub fn storage_key(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{query}", self.base),
            None => self.base.clone(),
        }
    }

    /// Storage key with the query string dropped
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Whether `storage_key` names this request, ignoring its query string
    #[must_use]
    pub fn same_resource(&self, storage_key: &str) -> bool {
        match storage_key.strip_prefix(self.base.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('?'),
            None => false,
        }
    }

    /// Hex SHA-256 of the storage key, used as the on-disk file name
    #[must_use]
    pub fn hash_key(&self) -> String {
        hex::encode(Sha256::digest(self.storage_key().as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(method: &str, url: &str) -> RequestKey {
        RequestKey::new(method, &Url::parse(url).unwrap())
    }

    #[test]
    fn fragment_is_dropped_and_method_uppercased() {
        let k = key("get", "http://localhost:8000/index.html#top");
        assert_eq!(k.storage_key(), "GET http://localhost:8000/index.html");
    }

    #[test]
    fn query_kept_in_storage_key() {
        let k = key("GET", "http://localhost:8000/currency-rates.json?t=1");
        assert_eq!(k.storage_key(), "GET http://localhost:8000/currency-rates.json?t=1");
        assert_eq!(k.base(), "GET http://localhost:8000/currency-rates.json");
    }

    #[test]
    fn same_resource_ignores_query_only() {
        let k = key("GET", "http://localhost:8000/rates.json?t=2");
        assert!(k.same_resource("GET http://localhost:8000/rates.json"));
        assert!(k.same_resource("GET http://localhost:8000/rates.json?t=1"));
        assert!(!k.same_resource("GET http://localhost:8000/rates.json.bak"));
        assert!(!k.same_resource("HEAD http://localhost:8000/rates.json"));
    }

    #[test]
    fn hash_key_differs_by_query() {
        let a = key("GET", "http://localhost:8000/a?x=1");
        let b = key("GET", "http://localhost:8000/a?x=2");
        assert_ne!(a.hash_key(), b.hash_key());
        assert_eq!(a.hash_key(), a.clone().hash_key());
    }

    #[test]
    fn hash_key_is_sha256_of_storage_key() {
        let k = key("GET", "http://localhost:8000/index.html");
        assert_eq!(
            k.hash_key(),
            "d57c1e92ddac62edb4da5314297d48a59869c5c65f4d045c2679252c83f9e367"
        );
    }
}
