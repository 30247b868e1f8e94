//! # swcache engine
//!
//! Cache-first request interception between a client and an origin server.
//! Every intercepted request is answered from the first source that can:
//! a fresh stored response, a navigation preload response, the network, a
//! stale stored response, and finally a synthetic network-error response.
//!
//! ## Features
//!
//! - **Freshness evaluation** from `Cache-Control`, `Date` and `Expires`, failing closed
//! - **Generation-scoped stores** with wholesale invalidation on activation
//! - **Lock-free storage** on crossbeam `SkipMap`, optional write-through to disk
//! - **Background refresh** after every fresh hit, isolated from the caller
//! - **Install-time seeding** of the application shell, revisioned through the build manifest
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use swcache_client::prelude::*;
//!
//! # async fn run() -> swcache_client::Result<()> {
//! let storage = Arc::new(CacheStorage::in_memory());
//! let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(Duration::from_secs(30))?);
//! let controller = InterceptionController::new(Arc::clone(&storage), "v2", transport);
//!
//! let request = CacheRequest::parse(Method::GET, "http://localhost:8000/currency-rates.json")?;
//! let response = controller.resolve(&request, None).await?;
//! println!("{} bytes", response.bytes().len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod lifecycle;
pub mod policy;
pub mod telemetry;
pub mod transport;

// Prelude with canonical types
pub mod prelude;

pub use crate::error::{CacheError, Result};
