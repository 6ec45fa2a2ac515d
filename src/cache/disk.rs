//! On-disk snapshots of catalog responses
//!
//! Provides a `DiskCache` that stores serializable data as JSON files with
//! expiry timestamps. Expired snapshots are still readable so the catalog can
//! fall back to old data when TMDb cannot be reached.

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Wrapper struct for a snapshot stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot<T> {
    data: T,
    cached_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Result of reading a snapshot, including freshness metadata
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was written
    pub cached_at: DateTime<Utc>,
    /// Whether the snapshot is past its expiry
    pub is_expired: bool,
}

/// Reads and writes JSON snapshots in a cache directory
///
/// `AppConfig` points it at the XDG cache directory (`~/.cache/marquee/` on Linux).
#[derive(Debug, Clone)]
pub struct DiskCache {
    cache_dir: PathBuf,
}

impl DiskCache {
    /// Creates a DiskCache rooted at `cache_dir`
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Maps a cache key to a file name made of `[a-z0-9_-]`
    ///
    /// Search keys carry user input, so anything outside that set becomes `_`.
    pub fn sanitize_key(key: &str) -> String {
        key.chars()
            .map(|c| {
                let c = c.to_ascii_lowercase();
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn snapshot_path(&self, key: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.json", Self::sanitize_key(key)))
    }

    /// Writes `data` under `key`, fresh for `ttl`
    ///
    /// Creates the cache directory if needed.
    pub fn write<T: Serialize>(&self, key: &str, data: &T, ttl: Duration) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)?;

        let now = Utc::now();
        let snapshot = Snapshot {
            data,
            cached_at: now,
            expires_at: now + ttl,
        };

        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(self.snapshot_path(key), json)
    }

    /// Reads the snapshot stored under `key`
    ///
    /// Returns `None` if the snapshot is missing or cannot be parsed. Expired
    /// snapshots are returned with `is_expired = true`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        let content = fs::read_to_string(self.snapshot_path(key)).ok()?;
        let snapshot: Snapshot<T> = serde_json::from_str(&content).ok()?;

        Some(CachedData {
            data: snapshot.data,
            cached_at: snapshot.cached_at,
            is_expired: Utc::now() > snapshot.expires_at,
        })
    }

    /// Deletes the snapshot stored under `key`, if any
    pub fn remove(&self, key: &str) -> std::io::Result<()> {
        match fs::remove_file(self.snapshot_path(key)) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
