//! Store operations: lookup, guarded put, delete and batch seeding

use std::ops::Bound;

use futures::future::join_all;
use http::{Method, StatusCode};

use super::core::CacheStore;
use crate::cache::{MatchOptions, RequestKey, StoredEntry};
use crate::error::{self, Result, SeedFailure};
use crate::http::{CacheRequest, CacheResponse};
use crate::transport::Transport;

/// Whether a response may be written to the store
///
/// Only successful, complete, non-redirected responses to GET requests are
/// storable; anything else would replay incorrectly.
#[must_use]
pub fn is_storable(request: &CacheRequest, response: &CacheResponse) -> bool {
    request.method() == Method::GET
        && response.is_success()
        && response.status() != StatusCode::PARTIAL_CONTENT
        && !response.is_redirected()
}

impl CacheStore {
    /// Find the entry stored for `key`
    ///
    /// With `ignore_query`, an exact match is preferred, then the first entry
    /// in key order that differs only by query string.
    pub fn lookup(&self, key: &RequestKey, options: MatchOptions) -> Option<StoredEntry> {
        let exact = self.entries.get(&key.storage_key()).map(|e| e.value().clone());
        if exact.is_some() || !options.ignore_query {
            return exact;
        }

        let base = key.base();
        self.entries
            .range::<str, _>((Bound::Included(base), Bound::Unbounded))
            .take_while(|e| e.key().starts_with(base))
            .find(|e| key.same_resource(e.key()))
            .map(|e| e.value().clone())
    }

    /// Convenience lookup by request
    pub fn lookup_request(&self, request: &CacheRequest, options: MatchOptions) -> Option<StoredEntry> {
        self.lookup(&RequestKey::from_request(request), options)
    }

    /// Store `response` for `request`, replacing any previous entry
    ///
    /// Returns `Ok(false)` without touching the store when the response is
    /// not storable (see [`is_storable`]).
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Storage` if the persisted copy cannot be written;
    /// the in-memory entry is left unchanged in that case.
    pub async fn put(&self, request: &CacheRequest, response: CacheResponse) -> Result<bool> {
        if !is_storable(request, &response) {
            tracing::debug!(
                target: "swcache::cache::store",
                generation = %self.generation,
                method = %request.method(),
                url = %request.url(),
                status = response.status().as_u16(),
                redirected = response.is_redirected(),
                "Response not storable, put skipped"
            );
            return Ok(false);
        }

        let entry = StoredEntry::new(RequestKey::from_request(request), response, self.clock.now());

        if let Some(disk) = &self.disk {
            disk.write(&entry)
                .await
                .map_err(|e| error::storage(&self.generation, e))?;
        }

        let storage_key = entry.key().storage_key();
        tracing::debug!(
            target: "swcache::cache::store",
            generation = %self.generation,
            key = %storage_key,
            size_bytes = entry.size_bytes(),
            "Entry stored"
        );
        self.entries.insert(storage_key, entry);
        Ok(true)
    }

    /// Remove the entry stored under exactly `key`
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Storage` if the persisted copy cannot be removed.
    pub async fn delete(&self, key: &RequestKey) -> Result<bool> {
        if let Some(disk) = &self.disk {
            disk.remove(key)
                .await
                .map_err(|e| error::storage(&self.generation, e))?;
        }
        Ok(self.entries.remove(&key.storage_key()).is_some())
    }

    /// Fetch every request in `requests` and store all responses
    ///
    /// Fetches run concurrently. Nothing is stored unless every fetch
    /// returned a 2xx response.
    ///
    /// # Errors
    ///
    /// `CacheError::Seed` listing every failed resource, or
    /// `CacheError::Storage` if a response cannot be written.
    pub async fn add_all(&self, transport: &dyn Transport, requests: &[CacheRequest]) -> Result<()> {
        let fetches = requests
            .iter()
            .map(|request| async move { (request, transport.fetch(request).await) });

        let mut fetched = Vec::with_capacity(requests.len());
        let mut failed = Vec::new();
        for (request, outcome) in join_all(fetches).await {
            match outcome {
                Ok(response) if response.is_success() => fetched.push((request, response)),
                Ok(response) => failed.push(SeedFailure {
                    url: request.url().to_string(),
                    reason: format!("status {}", response.status()),
                }),
                Err(e) => failed.push(SeedFailure {
                    url: request.url().to_string(),
                    reason: e.to_string(),
                }),
            }
        }

        if !failed.is_empty() {
            return Err(error::seed(failed));
        }

        for (request, response) in fetched {
            self.put(request, response).await?;
        }
        Ok(())
    }
}
