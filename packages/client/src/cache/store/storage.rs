//! `CacheStorage`: the registry of generation-named stores

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_skiplist::SkipMap;

use super::core::CacheStore;
use super::persistence::DiskStore;
use crate::clock::{Clock, SystemClock};
use crate::config::ConfigValidator;
use crate::error::{self, Result};

/// Named, versioned response stores
///
/// Opening a generation is idempotent. With a storage root, each
/// generation lives in `<root>/<generation>/` and survives restarts.
pub struct CacheStorage {
    stores: SkipMap<String, Arc<CacheStore>>,
    root: Option<PathBuf>,
    clock: Arc<dyn Clock>,
}

impl Default for CacheStorage {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl CacheStorage {
    /// Storage that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            stores: SkipMap::new(),
            root: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Storage persisted under `root`
    pub fn persistent(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::in_memory()
        }
    }

    /// Replace the clock used to stamp stored entries
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Return the store for `generation`, creating it if needed
    ///
    /// # Errors
    ///
    /// `CacheError::Config` for a label that cannot name a store,
    /// `CacheError::Storage` if the persisted store cannot be created or read.
    pub async fn open(&self, generation: &str) -> Result<Arc<CacheStore>> {
        if let Some(entry) = self.stores.get(generation) {
            return Ok(Arc::clone(entry.value()));
        }

        ConfigValidator::validate_generation(generation)?;

        let store = match &self.root {
            Some(root) => {
                let disk = DiskStore::create(root.join(generation))
                    .await
                    .map_err(|e| error::storage(generation, e))?;
                let persisted = disk.load().await.map_err(|e| error::storage(generation, e))?;
                tracing::debug!(
                    target: "swcache::cache::storage",
                    generation,
                    dir = %disk.dir().display(),
                    entries = persisted.len(),
                    "Opened persisted cache generation"
                );
                CacheStore::with_disk(generation, Arc::clone(&self.clock), disk, persisted)
            }
            None => CacheStore::new(generation, Arc::clone(&self.clock)),
        };

        // A concurrent open may have won; both loaded the same state
        let entry = self
            .stores
            .get_or_insert(generation.to_string(), Arc::new(store));
        Ok(Arc::clone(entry.value()))
    }

    /// Whether `generation` exists, opened or persisted
    ///
    /// # Errors
    ///
    /// `CacheError::Storage` if the storage root cannot be listed.
    pub async fn has(&self, generation: &str) -> Result<bool> {
        Ok(self.list_generations().await?.contains(generation))
    }

    /// Every known generation label
    ///
    /// # Errors
    ///
    /// `CacheError::Storage` if the storage root cannot be listed.
    pub async fn list_generations(&self) -> Result<BTreeSet<String>> {
        let mut generations: BTreeSet<String> =
            self.stores.iter().map(|e| e.key().clone()).collect();

        if let Some(root) = &self.root {
            let on_disk = list_dirs(root)
                .await
                .map_err(|e| error::storage(&root.display().to_string(), e))?;
            generations.extend(on_disk);
        }

        Ok(generations)
    }

    /// Remove `generation` and everything stored in it
    ///
    /// Returns whether anything was removed. Handles already returned by
    /// [`CacheStorage::open`] keep their in-memory entries.
    ///
    /// # Errors
    ///
    /// `CacheError::Storage` if the persisted directory cannot be removed.
    pub async fn delete(&self, generation: &str) -> Result<bool> {
        let mut removed = self.stores.remove(generation).is_some();

        if let Some(root) = &self.root
            && ConfigValidator::validate_generation(generation).is_ok()
        {
            match tokio::fs::remove_dir_all(root.join(generation)).await {
                Ok(()) => removed = true,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(error::storage(generation, e)),
            }
        }

        Ok(removed)
    }
}

async fn list_dirs(root: &Path) -> io::Result<Vec<String>> {
    let mut dir = match tokio::fs::read_dir(root).await {
        Ok(dir) => dir,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut names = Vec::new();
    while let Some(entry) = dir.next_entry().await? {
        if entry.file_type().await?.is_dir()
            && let Some(name) = entry.file_name().to_str()
        {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

impl std::fmt::Debug for CacheStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStorage")
            .field("open", &self.stores.len())
            .field("root", &self.root)
            .finish()
    }
}
