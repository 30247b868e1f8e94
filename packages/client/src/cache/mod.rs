//! Generation-scoped HTTP response store with freshness evaluation
//!
//! This module provides the storage half of the interception layer:
//! - `CacheStorage`: registry of named, versioned stores (one per generation)
//! - `CacheStore`: lock-free `SkipMap` from request key to stored response
//! - Freshness evaluation from `Cache-Control`, `Date` and `Expires`
//! - Optional write-through persistence, one directory per generation

pub mod cache_entry;
pub mod cache_key;
pub mod freshness;
pub mod http_date;
pub mod store;

pub use cache_entry::StoredEntry;
pub use cache_key::{MatchOptions, RequestKey};
pub use freshness::{FreshnessVerdict, is_fresh, verdict};
pub use http_date::{HttpDateParseError, httpdate};
pub use store::{CacheStorage, CacheStore, is_storable};
