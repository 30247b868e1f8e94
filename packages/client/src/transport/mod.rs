//! Network collaborators of the interception controller
//!
//! - `Transport`: performs a request against the origin
//! - `HttpTransport`: hyper-based HTTP(S) transport with a request timeout
//! - `Preload`: a speculative response the environment may already be fetching

use futures::future::BoxFuture;

pub mod http;
pub mod preload;

pub use self::http::{HttpTransport, client_config};
pub use preload::{NavigationPreload, Preload};

use crate::error::Result;
use crate::http::{CacheRequest, CacheResponse};

/// Network transport capability
///
/// Implementations own their timeout policy: a request that gets no response
/// in time must resolve to a `CacheError::Network` with kind `Timeout`.
pub trait Transport: Send + Sync {
    fn fetch<'a>(&'a self, request: &'a CacheRequest) -> BoxFuture<'a, Result<CacheResponse>>;
}
