//! `ServiceCache`: one deployed cache generation
//!
//! Owns the interception controller and lifecycle manager produced by
//! [`crate::ServiceCacheBuilder::build`]. Both share storage, transport and
//! the navigation preload switch.

use std::path::Path;

use swcache_client::error::Result;
use swcache_client::prelude::*;
use swcache_client::telemetry::InterceptStatsSnapshot;

use crate::builder::core::resolve_path;
use crate::builder::{RequestBuilder, ServiceCacheBuilder};

/// Cache-first interception for one generation
#[derive(Debug)]
pub struct ServiceCache {
    config: CacheConfig,
    controller: InterceptionController,
    lifecycle: LifecycleManager,
}

impl ServiceCache {
    pub(crate) fn new(config: CacheConfig, controller: InterceptionController, lifecycle: LifecycleManager) -> Self {
        Self {
            config,
            controller,
            lifecycle,
        }
    }

    #[must_use]
    pub fn builder() -> ServiceCacheBuilder {
        ServiceCacheBuilder::new()
    }

    /// Build from a parsed configuration
    ///
    /// # Errors
    ///
    /// As [`ServiceCacheBuilder::build`].
    pub fn from_config(config: CacheConfig) -> Result<Self> {
        ServiceCacheBuilder::from_config(config).build()
    }

    /// Build from a JSON configuration file
    ///
    /// # Errors
    ///
    /// `CacheError::Config` if the file cannot be read or parsed, otherwise
    /// as [`ServiceCacheBuilder::build`].
    pub fn from_config_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_config(CacheConfig::from_path(path)?)
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn generation(&self) -> &str {
        self.controller.generation()
    }

    pub fn controller(&self) -> &InterceptionController {
        &self.controller
    }

    pub fn lifecycle(&self) -> &LifecycleManager {
        &self.lifecycle
    }

    /// Seed the current generation
    ///
    /// # Errors
    ///
    /// `CacheError::Seed` naming every resource that failed; nothing is
    /// stored in that case. Resolution keeps working regardless.
    pub async fn install(&self) -> Result<()> {
        self.lifecycle.install().await
    }

    /// Sweep older generations and switch navigation preload on
    pub async fn activate(&self) -> ActivationReport {
        self.lifecycle.activate().await
    }

    /// Install then activate
    ///
    /// # Errors
    ///
    /// As [`ServiceCache::install`]; activation is skipped when seeding fails.
    pub async fn start(&self) -> Result<ActivationReport> {
        self.install().await?;
        Ok(self.activate().await)
    }

    /// Request builder for an origin-relative path
    ///
    /// # Errors
    ///
    /// `CacheError::InvalidRequest` if `path` does not join onto the origin.
    pub fn request(&self, path: &str) -> Result<RequestBuilder> {
        let request = resolve_path(&self.config.origin, path)?;
        Ok(RequestBuilder::get(request.url().clone()))
    }

    /// Navigation request for an origin-relative path
    ///
    /// # Errors
    ///
    /// As [`ServiceCache::request`].
    pub fn navigate(&self, path: &str) -> Result<CacheRequest> {
        Ok(self.request(path)?.navigation().build())
    }

    /// Resolve `request` cache-first
    ///
    /// # Errors
    ///
    /// Only when the store itself is unusable.
    pub async fn resolve(&self, request: &CacheRequest) -> Result<CacheResponse> {
        self.controller.resolve(request, None).await
    }

    /// Resolve `request`, offering an in-flight preload response
    ///
    /// # Errors
    ///
    /// As [`ServiceCache::resolve`].
    pub async fn resolve_with_preload(&self, request: &CacheRequest, preload: Preload) -> Result<CacheResponse> {
        self.controller.resolve(request, Some(preload)).await
    }

    /// Resolve `request`, reporting which source answered
    ///
    /// # Errors
    ///
    /// As [`ServiceCache::resolve`].
    pub async fn resolve_detailed(&self, request: &CacheRequest, preload: Option<Preload>) -> Result<Resolution> {
        let resolution = self.controller.resolve_detailed(request, preload).await?;
        tracing::debug!(
            target: "swcache::service",
            url = %request.url(),
            source = resolution.source(),
            status = resolution.response().status().as_u16(),
            "Request resolved"
        );
        Ok(resolution)
    }

    #[must_use]
    pub fn stats(&self) -> InterceptStatsSnapshot {
        self.controller.stats().snapshot()
    }

    /// Wait for every background refresh started so far
    pub async fn wait_for_refreshes(&self) {
        self.controller.wait_for_refreshes().await;
    }
}
