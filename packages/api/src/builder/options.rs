//! Chainable settings for `ServiceCacheBuilder`

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use swcache_client::prelude::*;
use url::Url;

use crate::builder::core::ServiceCacheBuilder;

impl ServiceCacheBuilder {
    /// Set the current cache generation label
    ///
    /// Every other generation is deleted on activation.
    #[must_use]
    pub fn generation(mut self, generation: impl Into<String>) -> Self {
        self.config.generation = generation.into();
        self
    }

    /// Set the origin seed and fallback paths are resolved against
    ///
    /// An unparseable URL is logged and the current origin kept.
    #[must_use]
    pub fn origin(mut self, origin: &str) -> Self {
        match origin.parse::<Url>() {
            Ok(parsed) => self.config.origin = parsed,
            Err(parse_error) => tracing::warn!(
                target: "swcache::builder",
                origin,
                error = %parse_error,
                current = %self.config.origin,
                "Invalid origin provided, keeping existing origin"
            ),
        }
        self
    }

    /// Replace the seed list fetched at install time
    #[must_use]
    pub fn seed<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.seed = SeedList::new(paths);
        self
    }

    /// Rewrite seed paths through a revision manifest
    #[must_use]
    pub fn manifest(mut self, manifest: RevisionManifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Read the revision manifest from `path` at build time
    #[must_use]
    pub fn manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.manifest = Some(path.into());
        self
    }

    /// Use a custom transport instead of the built-in HTTP one
    #[must_use]
    pub fn transport<T>(self, transport: T) -> Self
    where
        T: Transport + 'static,
    {
        self.shared_transport(Arc::new(transport))
    }

    #[must_use]
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the wall clock used for stamping and freshness
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Persist stores under `dir`
    #[must_use]
    pub fn storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.storage_dir = Some(dir.into());
        self
    }

    /// Keep stores in memory only
    #[must_use]
    pub fn in_memory(mut self) -> Self {
        self.config.storage_dir = None;
        self
    }

    #[must_use]
    pub fn ignore_query(mut self, ignore: bool) -> Self {
        self.config.ignore_query = ignore;
        self
    }

    /// Whether activation switches navigation preload on
    #[must_use]
    pub fn navigation_preload(mut self, enabled: bool) -> Self {
        self.config.navigation_preload = enabled;
        self
    }

    /// Stored document served to navigations when offline
    #[must_use]
    pub fn offline_fallback(mut self, path: impl Into<String>) -> Self {
        self.config.offline_fallback = Some(path.into());
        self
    }

    /// Transport timeout; ignored when a custom transport is set
    #[must_use]
    pub fn network_timeout(mut self, timeout: Duration) -> Self {
        self.config.network_timeout_secs = timeout.as_secs();
        self
    }

    /// Log the assembled configuration at build time
    #[must_use]
    pub fn debug(mut self) -> Self {
        self.debug_enabled = true;
        self
    }
}
