//! swcache engine prelude
//!
//! The types an embedding application touches when wiring up interception.

// Request and response snapshots
pub use crate::http::{CacheRequest, CacheResponse, RequestCacheMode};

// Errors
pub use crate::error::{CacheError, Result};

// Store and freshness
pub use crate::cache::{CacheStorage, CacheStore, FreshnessVerdict, MatchOptions, RequestKey, StoredEntry};

// Resolution
pub use crate::interceptor::{InterceptOptions, InterceptionController, Resolution};
pub use crate::lifecycle::{ActivationReport, LifecycleManager, RevisionManifest, SeedList};
pub use crate::policy::RequestCachePreference;

// Collaborators
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::CacheConfig;
pub use crate::transport::{HttpTransport, NavigationPreload, Preload, Transport};

// HTTP standard types from http crate
pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
