//! Background refresh after a fresh hit
//!
//! Refreshes run as spawned tasks detached from the request that triggered
//! them: they are never awaited by the caller, their errors are logged and
//! counted here, and they keep running if the caller goes away.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

use crate::cache::CacheStore;
use crate::http::CacheRequest;
use crate::telemetry::InterceptStats;
use crate::transport::{Preload, Transport};

/// Work item for one refresh
pub(crate) struct RefreshTask {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) store: Arc<CacheStore>,
    pub(crate) request: CacheRequest,
    pub(crate) preload: Option<Preload>,
    pub(crate) stats: Arc<InterceptStats>,
}

impl RefreshTask {
    async fn run(self) {
        let RefreshTask {
            transport,
            store,
            request,
            preload,
            stats,
        } = self;

        let response = match preload.map(Preload::into_response) {
            Some(pending) => match pending.await {
                Ok(response) => Ok(response),
                Err(e) => {
                    tracing::debug!(
                        target: "swcache::interceptor::refresh",
                        url = %request.url(),
                        error = %e,
                        "Preload unavailable for refresh, fetching from network"
                    );
                    transport.fetch(&request).await
                }
            },
            None => transport.fetch(&request).await,
        };

        let outcome = match response {
            Ok(response) => store.put(&request, response).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(true) => tracing::debug!(
                target: "swcache::interceptor::refresh",
                url = %request.url(),
                generation = store.generation(),
                "Background refresh replaced cache entry"
            ),
            Ok(false) => {
                InterceptStats::record(&stats.rejected_puts);
                tracing::debug!(
                    target: "swcache::interceptor::refresh",
                    url = %request.url(),
                    "Background refresh response not storable, entry kept"
                );
            }
            Err(e) => {
                InterceptStats::record(&stats.refreshes_failed);
                tracing::warn!(
                    target: "swcache::interceptor::refresh",
                    url = %request.url(),
                    error = %e,
                    "Background refresh failed"
                );
            }
        }
    }
}

/// Spawns refresh tasks and tracks how many are still running
#[derive(Debug, Default)]
pub(crate) struct RefreshTracker {
    in_flight: AtomicUsize,
    idle: Notify,
}

impl RefreshTracker {
    /// Spawn `task` on the current tokio runtime
    pub(crate) fn spawn(self: &Arc<Self>, task: RefreshTask) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(
                target: "swcache::interceptor::refresh",
                url = %task.request.url(),
                "No tokio runtime available for background refresh, refresh skipped"
            );
            return;
        };

        InterceptStats::record(&task.stats.refreshes_started);
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let guard = InFlight(Arc::clone(self));

        handle.spawn(async move {
            let _guard = guard;
            task.run().await;
        });
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Resolve once no refresh is running
    pub(crate) async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Decrements the in-flight count when the task ends, even by panic
struct InFlight(Arc<RefreshTracker>);

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.0.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}
