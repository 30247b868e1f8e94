//! Core `CacheStore` structure
//!
//! One store per cache generation, keyed by full storage key (method, URL
//! and query) in a crossbeam `SkipMap`. Ordered keys let query-insensitive
//! lookups scan only the entries sharing a base key.

use std::sync::Arc;

use crossbeam_skiplist::SkipMap;

use super::persistence::DiskStore;
use crate::cache::StoredEntry;
use crate::clock::Clock;

/// Lock-free response store for one cache generation
pub struct CacheStore {
    /// Generation label this store belongs to
    pub(super) generation: Arc<str>,
    /// Storage key -> entry
    pub(super) entries: SkipMap<String, StoredEntry>,
    /// Write-through persistence, when a storage root is configured
    pub(super) disk: Option<DiskStore>,
    /// Stamps `stored_at` on every put
    pub(super) clock: Arc<dyn Clock>,
}

impl CacheStore {
    /// Create an empty in-memory store
    pub fn new(generation: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            generation: Arc::from(generation),
            entries: SkipMap::new(),
            disk: None,
            clock,
        }
    }

    /// Create a store backed by `disk`, pre-populated with its persisted entries
    pub(super) fn with_disk(
        generation: &str,
        clock: Arc<dyn Clock>,
        disk: DiskStore,
        persisted: Vec<StoredEntry>,
    ) -> Self {
        let entries = SkipMap::new();
        for entry in persisted {
            entries.insert(entry.key().storage_key(), entry);
        }

        Self {
            generation: Arc::from(generation),
            entries,
            disk: Some(disk),
            clock,
        }
    }

    /// Generation label
    pub fn generation(&self) -> &str {
        &self.generation
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Storage keys in lexicographic order
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    /// Approximate bytes held by all entries
    pub fn size_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.value().size_bytes()).sum()
    }

    /// Whether writes are persisted to disk
    pub fn is_persistent(&self) -> bool {
        self.disk.is_some()
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("generation", &self.generation)
            .field("entries", &self.entries.len())
            .field("persistent", &self.disk.is_some())
            .finish()
    }
}
