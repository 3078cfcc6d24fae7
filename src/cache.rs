//! File-based caching for downloaded datasets.
//!
//! Datasets fetched over HTTP are stored as JSON files with a TTL so that
//! repeated checks do not refetch them.
//!
//! # Cache Location
//!
//! - Linux: `~/.cache/pkgguard/`
//! - macOS: `~/Library/Caches/pkgguard/`
//! - Windows: `%LOCALAPPDATA%\pkgguard\`
//!
//! # Example
//!
//! ```no_run
//! use pkgguard::Cache;
//!
//! let cache = Cache::new();
//! cache.set("dataset_example", &vec!["left-pad".to_string()]).unwrap();
//!
//! let value: Option<Vec<String>> = cache.get("dataset_example");
//! assert_eq!(value, Some(vec!["left-pad".to_string()]));
//! ```

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::platform::cache_dir;

/// Default cache TTL in hours.
const CACHE_TTL_HOURS: u64 = 24;

/// A file-based cache with TTL support.
///
/// Values are stored as JSON files. Entries older than the TTL are removed
/// on read.
#[derive(Debug, Clone)]
pub struct Cache {
    dir: PathBuf,
    ttl: Duration,
}

impl Cache {
    /// Creates a cache in the platform cache directory with a 24-hour TTL.
    pub fn new() -> Self {
        Self::with_ttl_hours(CACHE_TTL_HOURS)
    }

    pub fn with_ttl_hours(hours: u64) -> Self {
        Self::at(cache_dir(), Duration::from_secs(hours.saturating_mul(3600)))
    }

    /// Creates a cache rooted at `dir`.
    pub fn at(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }

    /// Converts a cache key to a safe filename.
    pub(crate) fn cache_path(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", safe_key))
    }

    /// Retrieves a value, or `None` if it is missing, expired or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.cache_path(key);

        if !path.exists() {
            return None;
        }

        if let Ok(elapsed) = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map(|modified| SystemTime::now().duration_since(modified).unwrap_or_default())
        {
            if elapsed > self.ttl {
                tracing::debug!("Cache entry {} expired", key);
                let _ = fs::remove_file(&path);
                return None;
            }
        }

        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("Ignoring unreadable cache entry {}: {}", key, err);
                None
            }
        }
    }

    /// Stores a value as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created or the file
    /// cannot be written.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.ensure_dir()?;
        let path = self.cache_path(key);
        let content = serde_json::to_string(value)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Removes all cached entries.
    pub fn clear(&self) -> Result<()> {
        if self.dir.exists() {
            for entry in fs::read_dir(&self.dir)?.flatten() {
                let path = entry.path();
                if path.extension().map(|e| e == "json").unwrap_or(false) {
                    let _ = fs::remove_file(path);
                }
            }
        }
        Ok(())
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}
