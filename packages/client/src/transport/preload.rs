//! Speculative preload responses
//!
//! A navigating client may start fetching a document before the
//! interception layer is consulted. `Preload` wraps that in-flight value;
//! rejection and an empty result are treated the same way by consumers.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::oneshot;

use crate::error::{self, Result};
use crate::http::CacheResponse;

/// In-flight preload response for a single request
pub struct Preload {
    inner: BoxFuture<'static, Result<Option<CacheResponse>>>,
}

impl Preload {
    /// A preload that has already completed
    #[must_use]
    pub fn ready(response: CacheResponse) -> Self {
        Self::from_future(async move { Ok(Some(response)) })
    }

    /// A preload that resolved to nothing
    #[must_use]
    pub fn empty() -> Self {
        Self::from_future(async { Ok(None) })
    }

    /// Wrap an arbitrary future
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Result<Option<CacheResponse>>> + Send + 'static,
    {
        Self {
            inner: future.boxed(),
        }
    }

    /// Wait on the producer side of a oneshot channel
    ///
    /// A dropped sender counts as a rejected preload.
    #[must_use]
    pub fn from_receiver(receiver: oneshot::Receiver<Option<CacheResponse>>) -> Self {
        Self::from_future(async move {
            receiver
                .await
                .map_err(|_| error::preload("preload producer dropped"))
        })
    }

    /// Wait for the preload and require a response
    ///
    /// # Errors
    ///
    /// `CacheError::Preload` if the preload failed or resolved empty.
    pub async fn into_response(self) -> Result<CacheResponse> {
        match self.inner.await {
            Ok(Some(response)) => Ok(response),
            Ok(None) => Err(error::preload("preload resolved empty")),
            Err(e) if e.is_preload() => Err(e),
            Err(e) => Err(error::preload(e.to_string())),
        }
    }
}

impl std::fmt::Debug for Preload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preload").finish_non_exhaustive()
    }
}

/// Whether supplied preload responses are honored
///
/// Starts disabled; the lifecycle manager enables it on activation.
#[derive(Debug, Default)]
pub struct NavigationPreload {
    enabled: AtomicBool,
}

impl NavigationPreload {
    /// State that already honors preloads
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: AtomicBool::new(true),
        }
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Release);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}
