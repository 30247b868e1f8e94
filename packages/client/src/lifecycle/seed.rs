//! Seed list: resources stored at install time

use serde::{Deserialize, Serialize};
use url::Url;

use super::manifest::RevisionManifest;
use crate::error::{self, Result};
use crate::http::CacheRequest;

/// Application shell plus the critical data resource
const DEFAULT_SEED: &[&str] = &[
    "/",
    "/index.html",
    "/css/app-shell.min.css",
    "/js/main.min.js",
    "/settings/index.html",
    "/currency-rates.json",
];

/// Origin-relative paths fetched and stored when a generation is installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedList {
    paths: Vec<String>,
}

impl Default for SeedList {
    fn default() -> Self {
        Self::new(DEFAULT_SEED.iter().copied())
    }
}

impl SeedList {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// GET requests for every seed path, revisioned through `manifest`
    ///
    /// # Errors
    ///
    /// `CacheError::InvalidRequest` if a path cannot be joined onto `origin`.
    pub fn requests(&self, origin: &Url, manifest: Option<&RevisionManifest>) -> Result<Vec<CacheRequest>> {
        self.paths
            .iter()
            .map(|path| {
                let path = manifest.map_or_else(|| path.clone(), |m| m.resolve(path));
                origin
                    .join(&path)
                    .map(CacheRequest::get)
                    .map_err(|e| error::invalid_request(format!("seed path `{path}`: {e}")))
            })
            .collect()
    }
}
