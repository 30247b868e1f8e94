//! Core `ServiceCacheBuilder` structure and the `build` step
//!
//! The builder accumulates a [`CacheConfig`] plus the collaborators that
//! cannot live in a config file (transport, clock, manifest). `build`
//! validates everything once and wires the controller and lifecycle manager
//! to the same storage, clock and navigation preload switch.

use std::sync::Arc;

use swcache_client::config::Validator;
use swcache_client::error::{self, Result};
use swcache_client::prelude::*;
use url::Url;

use crate::service::ServiceCache;

/// Fluent builder for [`ServiceCache`]
#[derive(Clone)]
pub struct ServiceCacheBuilder {
    /// Serializable settings
    pub(crate) config: CacheConfig,
    /// Manifest supplied in code; takes precedence over `config.manifest`
    pub(crate) manifest: Option<RevisionManifest>,
    /// Transport override; an `HttpTransport` is built otherwise
    pub(crate) transport: Option<Arc<dyn Transport>>,
    /// Clock override, shared by storage and controller
    pub(crate) clock: Option<Arc<dyn Clock>>,
    /// Debug logging enabled flag
    pub(crate) debug_enabled: bool,
}

impl Default for ServiceCacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceCacheBuilder {
    /// Start from the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(CacheConfig::default())
    }

    /// Start from an existing configuration
    #[must_use]
    pub fn from_config(config: CacheConfig) -> Self {
        Self {
            config,
            manifest: None,
            transport: None,
            clock: None,
            debug_enabled: false,
        }
    }

    /// Configuration as currently accumulated
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Validate the configuration and assemble the cache
    ///
    /// # Errors
    ///
    /// `CacheError::Config` for an invalid setting, an unreadable manifest or
    /// a failed TLS setup of the default transport,
    /// `CacheError::InvalidRequest` if a seed or fallback path cannot be
    /// resolved against the origin.
    pub fn build(self) -> Result<ServiceCache> {
        let ServiceCacheBuilder {
            config,
            manifest,
            transport,
            clock,
            debug_enabled,
        } = self;

        config.validate()?;

        let manifest = match (manifest, &config.manifest) {
            (Some(manifest), _) => Some(manifest),
            (None, Some(path)) => Some(RevisionManifest::from_path(path)?),
            (None, None) => None,
        };

        let clock = clock.unwrap_or_else(|| Arc::new(SystemClock));
        let storage = match &config.storage_dir {
            Some(dir) => CacheStorage::persistent(dir),
            None => CacheStorage::in_memory(),
        };
        let storage = Arc::new(storage.with_clock(Arc::clone(&clock)));
        let transport: Arc<dyn Transport> = match transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(config.network_timeout())?),
        };

        let seed = config.seed.requests(&config.origin, manifest.as_ref())?;
        let offline_fallback = config
            .offline_fallback
            .as_deref()
            .map(|path| resolve_path(&config.origin, path))
            .transpose()?;

        let navigation_preload = Arc::new(NavigationPreload::default());
        let controller =
            InterceptionController::new(Arc::clone(&storage), &config.generation, Arc::clone(&transport))
                .with_clock(clock)
                .with_options(InterceptOptions {
                    ignore_query: config.ignore_query,
                    offline_fallback,
                })
                .with_navigation_preload(Arc::clone(&navigation_preload));
        let lifecycle = LifecycleManager::new(storage, &config.generation, transport, seed)
            .with_navigation_preload(navigation_preload, config.navigation_preload);

        if debug_enabled {
            tracing::debug!(
                target: "swcache::builder",
                generation = %config.generation,
                origin = %config.origin,
                seed = lifecycle.seed().len(),
                persistent = config.storage_dir.is_some(),
                revisioned = manifest.is_some(),
                "Service cache assembled"
            );
        }

        Ok(ServiceCache::new(config, controller, lifecycle))
    }
}

/// GET request for an origin-relative path
pub(crate) fn resolve_path(origin: &Url, path: &str) -> Result<CacheRequest> {
    origin
        .join(path)
        .map(CacheRequest::get)
        .map_err(|e| error::invalid_request(format!("`{path}` against {origin}: {e}")))
}

impl std::fmt::Debug for ServiceCacheBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCacheBuilder")
            .field("config", &self.config)
            .field("manifest", &self.manifest)
            .field("custom_transport", &self.transport.is_some())
            .field("custom_clock", &self.clock.is_some())
            .field("debug_enabled", &self.debug_enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_in_memory_cache() {
        let cache = ServiceCacheBuilder::new().build().unwrap();
        assert_eq!(cache.generation(), "v1");
        assert_eq!(cache.lifecycle().seed().len(), SeedList::default().paths().len());
        assert!(cache.controller().storage().root().is_none());
        assert!(!cache.controller().navigation_preload().is_enabled());
    }

    #[test]
    fn invalid_generation_rejected() {
        let err = ServiceCacheBuilder::new().generation("v1/../v0").build().unwrap_err();
        assert!(matches!(err, CacheError::Config(_)));
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = ServiceCacheBuilder::new()
            .network_timeout(std::time::Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, CacheError::Config(_)));
    }

    #[test]
    fn manifest_rewrites_seed_urls() {
        let mut manifest = RevisionManifest::new();
        manifest.insert("/js/main.min.js", "/js/main.min-9f8e7d6c.js");

        let cache = ServiceCacheBuilder::new()
            .origin("https://rates.example.com/")
            .seed(["/", "/js/main.min.js"])
            .manifest(manifest)
            .build()
            .unwrap();

        let urls: Vec<_> = cache.lifecycle().seed().iter().map(|r| r.url().as_str()).collect();
        assert_eq!(
            urls,
            [
                "https://rates.example.com/",
                "https://rates.example.com/js/main.min-9f8e7d6c.js"
            ]
        );
    }

    #[test]
    fn offline_fallback_resolved_against_origin() {
        let cache = ServiceCacheBuilder::new()
            .origin("https://rates.example.com/app/")
            .offline_fallback("/app/index.html")
            .build()
            .unwrap();

        let fallback = cache.controller().options().offline_fallback.as_ref().unwrap();
        assert_eq!(fallback.url().as_str(), "https://rates.example.com/app/index.html");
    }
}
