//! Content-addressed result cache.
//!
//! One JSON file per key, `<dir>/<key>.json`, holding `{json, md}`. There is
//! no index, eviction or expiry; the file's presence is the existence check.
//! Reads and writes never fail the pipeline: an unreadable entry is a miss
//! and a failed write is reported as [`CacheWriteFailure`].

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CacheWriteFailure;
use crate::result::ScrapeResult;

/// Distinguishes temp files of concurrent writers within one process.
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// A persisted scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub json: ScrapeResult,
    pub md: String,
}

/// File-backed cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct ResultCache {
    dir: PathBuf,
}

impl ResultCache {
    /// Cache rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads the entry for `key`. Missing, unreadable or corrupt entries
    /// are all reported as `None`.
    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cache read failed");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cache entry is corrupt");
                None
            }
        }
    }

    /// Writes (or overwrites) the entry for `key`.
    ///
    /// The entry is written to a temp file in the cache directory and renamed
    /// over `<key>.json`, so readers and racing writers only ever see a
    /// complete entry. The last rename wins.
    pub async fn set(&self, key: &str, entry: &CacheEntry) -> Result<(), CacheWriteFailure> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(CacheWriteFailure::CreateDir)?;

        let bytes = serde_json::to_vec(entry)?;
        let path = self.path_for(key);
        let tmp_path = self.tmp_path_for(key);

        if let Err(e) = tokio::fs::write(&tmp_path, bytes).await {
            discard(&tmp_path).await;
            return Err(CacheWriteFailure::Write(e));
        }

        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            discard(&tmp_path).await;
            return Err(CacheWriteFailure::Write(e));
        }

        debug!(path = %path.display(), "cache entry written");
        Ok(())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn tmp_path_for(&self, key: &str) -> PathBuf {
        let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(".{key}.{}.{seq}.tmp", std::process::id()))
    }
}

async fn discard(tmp_path: &Path) {
    if let Err(e) = tokio::fs::remove_file(tmp_path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        debug!(path = %tmp_path.display(), error = %e, "stale cache temp file left behind");
    }
}
