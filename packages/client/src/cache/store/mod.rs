//! Response store modules
//!
//! The functionality is organized into logical modules:
//!
//! - `core`: `CacheStore` struct for a single generation
//! - `operations`: lookup, guarded put, delete and seeding
//! - `persistence`: optional one-file-per-entry write-through to disk
//! - `storage`: `CacheStorage`, the registry of generation-named stores
//!
//! Concurrent access goes through crossbeam's lock-free `SkipMap`; a put is
//! a single insert, so concurrent writers to one key are last-write-wins.

pub mod core;
pub mod operations;
pub mod persistence;
pub mod storage;

pub use self::core::CacheStore;
pub use operations::is_storable;
pub use storage::CacheStorage;
