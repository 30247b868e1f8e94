//! `InterceptionController`: the cache-first resolver
//!
//! Resolution order for every request:
//!
//! 1. look up the current generation, ignoring the query string by default
//! 2. fresh entry and the caller accepts cache: return it, refresh in background
//! 3. preload response available: store and return it
//! 4. network: store (when storable) and return
//! 5. network failed: stale entry, then offline fallback for navigations,
//!    then the synthetic network-error response
//!
//! Storage faults on this path propagate to the caller. Network and preload
//! failures never do.

use std::sync::Arc;

use super::refresh::{RefreshTask, RefreshTracker};
use super::resolution::Resolution;
use crate::cache::{CacheStorage, CacheStore, MatchOptions, StoredEntry, freshness};
use crate::clock::{Clock, SystemClock};
use crate::error::{CacheError, Result};
use crate::http::{CacheRequest, CacheResponse};
use crate::policy::RequestCachePreference;
use crate::telemetry::InterceptStats;
use crate::transport::{NavigationPreload, Preload, Transport};

/// Per-deployment resolution options
#[derive(Debug, Clone)]
pub struct InterceptOptions {
    /// Keys differing only by query string match the same entry
    pub ignore_query: bool,
    /// Stored document served to navigations when both network and store miss
    pub offline_fallback: Option<CacheRequest>,
}

impl Default for InterceptOptions {
    fn default() -> Self {
        Self {
            ignore_query: true,
            offline_fallback: None,
        }
    }
}

/// Cache-first request resolver bound to one cache generation
///
/// Cheap to clone; clones share the store, transport, stats and the set of
/// running background refreshes.
#[derive(Clone)]
pub struct InterceptionController {
    storage: Arc<CacheStorage>,
    generation: Arc<str>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    options: InterceptOptions,
    navigation_preload: Arc<NavigationPreload>,
    stats: Arc<InterceptStats>,
    refreshes: Arc<RefreshTracker>,
}

impl InterceptionController {
    /// Create a controller serving `generation` out of `storage`
    ///
    /// Navigation preload starts disabled; see [`NavigationPreload`].
    pub fn new(storage: Arc<CacheStorage>, generation: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            storage,
            generation: Arc::from(generation),
            transport,
            clock: Arc::new(SystemClock),
            options: InterceptOptions::default(),
            navigation_preload: Arc::new(NavigationPreload::default()),
            stats: Arc::new(InterceptStats::new()),
            refreshes: Arc::new(RefreshTracker::default()),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: InterceptOptions) -> Self {
        self.options = options;
        self
    }

    /// Share a navigation preload switch with the lifecycle manager
    #[must_use]
    pub fn with_navigation_preload(mut self, state: Arc<NavigationPreload>) -> Self {
        self.navigation_preload = state;
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: Arc<InterceptStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn generation(&self) -> &str {
        &self.generation
    }

    pub fn storage(&self) -> &Arc<CacheStorage> {
        &self.storage
    }

    pub fn stats(&self) -> &Arc<InterceptStats> {
        &self.stats
    }

    pub fn navigation_preload(&self) -> &Arc<NavigationPreload> {
        &self.navigation_preload
    }

    pub fn options(&self) -> &InterceptOptions {
        &self.options
    }

    /// Resolve `request` to a response
    ///
    /// # Errors
    ///
    /// Only `CacheError::Storage` (and `CacheError::Config` for an unusable
    /// generation label). Network trouble yields a stale entry or the
    /// synthetic network-error response instead.
    pub async fn resolve(&self, request: &CacheRequest, preload: Option<Preload>) -> Result<CacheResponse> {
        self.resolve_detailed(request, preload)
            .await
            .map(Resolution::into_response)
    }

    /// Resolve `request`, reporting where the response came from
    ///
    /// # Errors
    ///
    /// As [`InterceptionController::resolve`].
    pub async fn resolve_detailed(
        &self,
        request: &CacheRequest,
        preload: Option<Preload>,
    ) -> Result<Resolution> {
        let store = self.storage.open(&self.generation).await?;
        let now = self.clock.now();
        let match_options = MatchOptions {
            ignore_query: self.options.ignore_query,
        };
        let cached = store.lookup_request(request, match_options);
        let preference = RequestCachePreference::of(request);
        let preload = self.admit_preload(request, preload);

        if let Some(entry) = &cached
            && preference.allows_cache()
            && freshness::is_fresh(Some(entry), now)
        {
            InterceptStats::record(&self.stats.fresh_hits);
            tracing::debug!(
                target: "swcache::interceptor",
                url = %request.url(),
                generation = %self.generation,
                "Serving fresh cache entry, refreshing in background"
            );
            self.refreshes.spawn(RefreshTask {
                transport: Arc::clone(&self.transport),
                store: Arc::clone(&store),
                request: request.clone(),
                preload,
                stats: Arc::clone(&self.stats),
            });
            return Ok(Resolution::Fresh(entry.response().clone()));
        }

        if let Some(preload) = preload {
            match preload.into_response().await {
                Ok(response) => {
                    tracing::info!(
                        target: "swcache::interceptor",
                        url = %request.url(),
                        status = response.status().as_u16(),
                        "Using preload response"
                    );
                    self.store_response(&store, request, response.clone()).await?;
                    InterceptStats::record(&self.stats.preload_serves);
                    return Ok(Resolution::Preloaded(response));
                }
                Err(e) => tracing::debug!(
                    target: "swcache::interceptor",
                    url = %request.url(),
                    error = %e,
                    "No preload response, trying network"
                ),
            }
        }

        match self.transport.fetch(request).await {
            Ok(response) => {
                self.store_response(&store, request, response.clone()).await?;
                InterceptStats::record(&self.stats.network_serves);
                Ok(Resolution::Network(response))
            }
            Err(e) => Ok(self.recover(&store, request, cached, &e, match_options)),
        }
    }

    /// Wait until every background refresh spawned so far has finished
    pub async fn wait_for_refreshes(&self) {
        self.refreshes.wait_idle().await;
    }

    /// Background refreshes still running
    pub fn refreshes_in_flight(&self) -> usize {
        self.refreshes.in_flight()
    }

    fn admit_preload(&self, request: &CacheRequest, preload: Option<Preload>) -> Option<Preload> {
        if preload.is_some() && !self.navigation_preload.is_enabled() {
            tracing::debug!(
                target: "swcache::interceptor",
                url = %request.url(),
                "Navigation preload disabled, ignoring preload response"
            );
            return None;
        }
        preload
    }

    async fn store_response(
        &self,
        store: &CacheStore,
        request: &CacheRequest,
        response: CacheResponse,
    ) -> Result<()> {
        if !store.put(request, response).await? {
            InterceptStats::record(&self.stats.rejected_puts);
        }
        Ok(())
    }

    fn recover(
        &self,
        store: &CacheStore,
        request: &CacheRequest,
        cached: Option<StoredEntry>,
        error: &CacheError,
        match_options: MatchOptions,
    ) -> Resolution {
        if let Some(entry) = cached {
            InterceptStats::record(&self.stats.stale_fallbacks);
            tracing::warn!(
                target: "swcache::interceptor",
                url = %request.url(),
                error = %error,
                "Network error unable to fetch resource, using stale cache entry"
            );
            return Resolution::Stale(entry.into_response());
        }

        if request.accepts_html()
            && let Some(fallback) = &self.options.offline_fallback
            && let Some(entry) = store.lookup_request(fallback, match_options)
        {
            InterceptStats::record(&self.stats.offline_fallbacks);
            tracing::warn!(
                target: "swcache::interceptor",
                url = %request.url(),
                fallback = %fallback.url(),
                error = %error,
                "Network error with nothing stored, serving offline fallback"
            );
            return Resolution::Fallback(entry.into_response());
        }

        InterceptStats::record(&self.stats.synthetic_errors);
        tracing::warn!(
            target: "swcache::interceptor",
            url = %request.url(),
            error = %error,
            "Network error with nothing stored, returning synthetic response"
        );
        Resolution::Synthetic(CacheResponse::network_error())
    }
}

impl std::fmt::Debug for InterceptionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptionController")
            .field("generation", &self.generation)
            .field("options", &self.options)
            .field("navigation_preload", &self.navigation_preload.is_enabled())
            .field("refreshes_in_flight", &self.refreshes.in_flight())
            .finish_non_exhaustive()
    }
}
