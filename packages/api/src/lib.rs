//! # swcache
//!
//! Cache-first offline request interception with a fluent setup API.
//!
//! [`ServiceCache`] bundles one cache generation: the interception controller
//! that answers requests and the lifecycle manager that seeds and sweeps the
//! stores. Build it with [`ServiceCache::builder`] or from a JSON
//! [`CacheConfig`].
//!
//! ```no_run
//! # async fn run() -> swcache::Result<()> {
//! let cache = swcache::ServiceCache::builder()
//!     .generation("v2")
//!     .origin("http://localhost:8000/")
//!     .offline_fallback("/index.html")
//!     .build()?;
//!
//! cache.install().await?;
//! cache.activate().await;
//!
//! let request = cache.request("/currency-rates.json")?.build();
//! let response = cache.resolve(&request).await?;
//! println!("{} {}", response.status(), response.bytes().len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod builder;
pub mod service;

pub use builder::{RequestBuilder, ServiceCacheBuilder};
pub use service::ServiceCache;

// Engine types callers handle directly
pub use swcache_client::prelude::*;
pub use swcache_client::telemetry::InterceptStatsSnapshot;
pub use swcache_client::{error, transport};

/// Start configuring a [`ServiceCache`]
///
/// Shorthand for `ServiceCache::builder()`
#[must_use]
pub fn builder() -> ServiceCacheBuilder {
    ServiceCacheBuilder::new()
}
