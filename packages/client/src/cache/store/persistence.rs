//! One-file-per-entry persistence
//!
//! Layout: `<root>/<generation>/<key hash>.json`. Each file holds one entry
//! with the body and header values base64-encoded, so header bytes outside
//! visible ASCII survive a reload. Writes go to a temporary file that is then
//! renamed over the target, so a reader never observes a half-written entry.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::cache::{RequestKey, StoredEntry};
use crate::http::CacheResponse;

const ENTRY_EXTENSION: &str = "json";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// On-disk representation of a stored entry
#[derive(Debug, Serialize, Deserialize)]
struct PersistedEntry {
    base: String,
    query: Option<String>,
    status: u16,
    /// Header names with base64-encoded raw values
    headers: Vec<(String, String)>,
    body: String,
    url: Option<String>,
    redirected: bool,
    stored_at_ms: u64,
}

impl PersistedEntry {
    fn from_entry(entry: &StoredEntry) -> Self {
        let response = entry.response();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    general_purpose::STANDARD.encode(value.as_bytes()),
                )
            })
            .collect();
        let stored_at_ms = entry
            .stored_at()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));

        Self {
            base: entry.key().base().to_string(),
            query: entry.key().query().map(str::to_string),
            status: response.status().as_u16(),
            headers,
            body: general_purpose::STANDARD.encode(response.bytes()),
            url: response.url().map(Url::to_string),
            redirected: response.is_redirected(),
            stored_at_ms,
        }
    }

    fn into_entry(self) -> io::Result<StoredEntry> {
        let status = StatusCode::from_u16(self.status).map_err(invalid_data)?;
        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in self.headers {
            let raw = general_purpose::STANDARD
                .decode(value.as_bytes())
                .map_err(invalid_data)?;
            headers.append(
                HeaderName::from_bytes(name.as_bytes()).map_err(invalid_data)?,
                HeaderValue::from_bytes(&raw).map_err(invalid_data)?,
            );
        }
        let body = general_purpose::STANDARD
            .decode(self.body.as_bytes())
            .map_err(invalid_data)?;

        let mut response = CacheResponse::from_parts(status, headers, Bytes::from(body))
            .redirected(self.redirected);
        if let Some(url) = self.url {
            response = response.with_url(Url::parse(&url).map_err(invalid_data)?);
        }

        let stored_at = SystemTime::UNIX_EPOCH + Duration::from_millis(self.stored_at_ms);
        Ok(StoredEntry::new(
            RequestKey::from_parts(self.base, self.query),
            response,
            stored_at,
        ))
    }
}

fn invalid_data<E>(e: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, e)
}

/// Directory holding one generation's entries
#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    /// Create the generation directory if needed
    pub async fn create(dir: PathBuf) -> io::Result<Self> {
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read every persisted entry
    ///
    /// Unreadable directories are errors. A corrupt entry file is skipped
    /// and logged, it only costs one cache miss. When several files hold the
    /// same key (for example files named by an older hash), the newest
    /// `stored_at` wins, superseded files are removed and the winner is moved
    /// to its current file name.
    pub async fn load(&self) -> io::Result<Vec<StoredEntry>> {
        let mut newest: HashMap<String, (StoredEntry, PathBuf)> = HashMap::new();
        let mut dir = tokio::fs::read_dir(&self.dir).await?;

        while let Some(file) = dir.next_entry().await? {
            let path = file.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }

            let raw = tokio::fs::read(&path).await?;
            let decoded = serde_json::from_slice::<PersistedEntry>(&raw)
                .map_err(invalid_data)
                .and_then(PersistedEntry::into_entry);
            match decoded {
                Ok(entry) => match newest.entry(entry.key().storage_key()) {
                    Entry::Vacant(slot) => {
                        slot.insert((entry, path));
                    }
                    Entry::Occupied(mut slot) => {
                        let (kept, _) = slot.get();
                        let replaces = entry.stored_at() > kept.stored_at()
                            || (entry.stored_at() == kept.stored_at()
                                && path == self.entry_path(entry.key()));
                        let superseded = if replaces {
                            slot.insert((entry, path)).1
                        } else {
                            path
                        };
                        self.discard(&superseded).await;
                    }
                },
                Err(e) => tracing::warn!(
                    target: "swcache::cache::persistence",
                    path = %path.display(),
                    error = %e,
                    "Skipping corrupt persisted cache entry"
                ),
            }
        }

        let mut entries = Vec::with_capacity(newest.len());
        for (entry, path) in newest.into_values() {
            let target = self.entry_path(entry.key());
            if path != target
                && let Err(e) = tokio::fs::rename(&path, &target).await
            {
                tracing::warn!(
                    target: "swcache::cache::persistence",
                    path = %path.display(),
                    error = %e,
                    "Unable to move persisted cache entry to its current name"
                );
            }
            entries.push(entry);
        }
        Ok(entries)
    }

    async fn discard(&self, path: &Path) {
        tracing::debug!(
            target: "swcache::cache::persistence",
            path = %path.display(),
            "Removing superseded persisted cache entry"
        );
        if let Err(e) = tokio::fs::remove_file(path).await
            && e.kind() != io::ErrorKind::NotFound
        {
            tracing::warn!(
                target: "swcache::cache::persistence",
                path = %path.display(),
                error = %e,
                "Unable to remove superseded persisted cache entry"
            );
        }
    }

    /// Atomically replace the file for `entry`
    pub async fn write(&self, entry: &StoredEntry) -> io::Result<()> {
        let json = serde_json::to_vec(&PersistedEntry::from_entry(entry)).map_err(invalid_data)?;
        let target = self.entry_path(entry.key());
        let temp = self.dir.join(format!(
            ".{}.{}.{}.tmp",
            entry.key().hash_key(),
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        tokio::fs::write(&temp, json).await?;
        if let Err(e) = tokio::fs::rename(&temp, &target).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e);
        }
        Ok(())
    }

    /// Remove the file for `key`, if present
    pub async fn remove(&self, key: &RequestKey) -> io::Result<()> {
        match tokio::fs::remove_file(self.entry_path(key)).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    fn entry_path(&self, key: &RequestKey) -> PathBuf {
        self.dir
            .join(format!("{}.{ENTRY_EXTENSION}", key.hash_key()))
    }
}
