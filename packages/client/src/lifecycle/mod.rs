//! Install and activation
//!
//! - install: seed the current generation with the application shell
//! - activate: sweep every other generation, then enable navigation preload
//!
//! Neither transition can break request resolution: a failed seed leaves
//! the controller answering from the network, and a failed sweep only
//! leaves old data on disk.

pub mod manifest;
pub mod seed;

use std::sync::Arc;

pub use manifest::RevisionManifest;
pub use seed::SeedList;

use crate::cache::CacheStorage;
use crate::error::{CacheError, Result};
use crate::http::CacheRequest;
use crate::transport::{NavigationPreload, Transport};

/// A generation that could not be swept
#[derive(Debug)]
pub struct SweepFailure {
    /// `None` when the generations could not even be listed
    pub generation: Option<String>,
    pub error: CacheError,
}

/// What activation did
#[derive(Debug, Default)]
pub struct ActivationReport {
    /// Generations removed
    pub deleted: Vec<String>,
    /// Generations left behind
    pub failed: Vec<SweepFailure>,
    /// Navigation preload was switched on
    pub navigation_preload: bool,
}

impl ActivationReport {
    /// Every stale generation was removed
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives the install and activate transitions for one generation
pub struct LifecycleManager {
    storage: Arc<CacheStorage>,
    generation: Arc<str>,
    transport: Arc<dyn Transport>,
    seed: Vec<CacheRequest>,
    navigation_preload: Arc<NavigationPreload>,
    enable_navigation_preload: bool,
}

impl LifecycleManager {
    pub fn new(
        storage: Arc<CacheStorage>,
        generation: &str,
        transport: Arc<dyn Transport>,
        seed: Vec<CacheRequest>,
    ) -> Self {
        Self {
            storage,
            generation: Arc::from(generation),
            transport,
            seed,
            navigation_preload: Arc::new(NavigationPreload::default()),
            enable_navigation_preload: true,
        }
    }

    /// Share the switch the controller reads, and whether activation flips it
    #[must_use]
    pub fn with_navigation_preload(mut self, state: Arc<NavigationPreload>, enable_on_activate: bool) -> Self {
        self.navigation_preload = state;
        self.enable_navigation_preload = enable_on_activate;
        self
    }

    pub fn generation(&self) -> &str {
        &self.generation
    }

    pub fn seed(&self) -> &[CacheRequest] {
        &self.seed
    }

    /// Fetch and store every seed resource into the current generation
    ///
    /// # Errors
    ///
    /// `CacheError::Seed` if any seed fetch failed, `CacheError::Storage` if
    /// the store is unusable.
    pub async fn install(&self) -> Result<()> {
        let store = self.storage.open(&self.generation).await?;

        match store.add_all(self.transport.as_ref(), &self.seed).await {
            Ok(()) => {
                tracing::info!(
                    target: "swcache::lifecycle",
                    generation = %self.generation,
                    resources = self.seed.len(),
                    "Seeded cache generation"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    target: "swcache::lifecycle",
                    generation = %self.generation,
                    error = %e,
                    "Seeding cache generation failed"
                );
                Err(e)
            }
        }
    }

    /// Delete every generation but the current one, then enable preload
    ///
    /// Best effort: failures are logged and reported, never returned.
    pub async fn activate(&self) -> ActivationReport {
        let mut report = ActivationReport::default();

        match self.storage.list_generations().await {
            Ok(generations) => {
                for generation in generations.into_iter().filter(|g| **g != *self.generation) {
                    match self.storage.delete(&generation).await {
                        Ok(_) => {
                            tracing::info!(
                                target: "swcache::lifecycle",
                                generation = %generation,
                                current = %self.generation,
                                "Deleted stale cache generation"
                            );
                            report.deleted.push(generation);
                        }
                        Err(error) => {
                            tracing::warn!(
                                target: "swcache::lifecycle",
                                generation = %generation,
                                error = %error,
                                "Unable to delete stale cache generation"
                            );
                            report.failed.push(SweepFailure {
                                generation: Some(generation),
                                error,
                            });
                        }
                    }
                }
            }
            Err(error) => {
                tracing::warn!(
                    target: "swcache::lifecycle",
                    error = %error,
                    "Unable to list cache generations, sweep skipped"
                );
                report.failed.push(SweepFailure {
                    generation: None,
                    error,
                });
            }
        }

        if self.enable_navigation_preload {
            self.navigation_preload.enable();
            report.navigation_preload = true;
        }

        report
    }
}

impl std::fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("generation", &self.generation)
            .field("seed", &self.seed.len())
            .field("enable_navigation_preload", &self.enable_navigation_preload)
            .finish_non_exhaustive()
    }
}
