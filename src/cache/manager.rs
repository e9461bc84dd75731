//! TTL cache with an on-disk mirror
//!
//! Provides a `TtlCache` that keeps `(timestamp, value)` pairs in memory and writes
//! each entry to its own JSON file as soon as it is set. Files are reloaded when the
//! cache is constructed, so entries survive between runs until their TTL runs out.

use chrono::Utc;
use directories::ProjectDirs;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Separator placed between the prefix and the argument list of a cache key
const PREFIX_SEPARATOR: &str = "_";

/// Separator placed between the arguments of a cache key
const ARG_SEPARATOR: &str = "-";

/// Extension used for every persisted cache file
const CACHE_FILE_EXTENSION: &str = "json";

/// Builds a cache key from a prefix and an ordered argument list
///
/// `cache_key("item", &[&8863])` is `"item_8863"`. Identical logical requests
/// always produce the same key.
pub fn cache_key(prefix: &str, args: &[&dyn std::fmt::Display]) -> String {
    let joined = args
        .iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(ARG_SEPARATOR);
    format!("{prefix}{PREFIX_SEPARATOR}{joined}")
}

/// Current wall-clock time in epoch seconds
fn now_secs() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

/// A single cached value together with the time it was stored
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Epoch seconds at which the value was stored
    pub timestamp: f64,
    /// The cached JSON value
    pub value: Value,
}

impl CacheEntry {
    /// Whether the entry is still fresh at `now` for the given TTL
    fn is_fresh(&self, ttl: Duration, now: f64) -> bool {
        now - self.timestamp < ttl.as_secs_f64()
    }
}

/// In-memory TTL cache mirrored to one file per key
///
/// On disk every entry is a two-element JSON array `[timestamp, value]` stored in
/// `<cache_dir>/<key>.json`. A cache without a directory works purely in memory.
#[derive(Debug, Default)]
pub struct TtlCache {
    /// Directory where cache files are stored, if any
    cache_dir: Option<PathBuf>,
    /// All loaded or stored entries keyed by cache key
    entries: HashMap<String, CacheEntry>,
}

impl TtlCache {
    /// Creates a cache in the XDG-compliant cache directory
    ///
    /// Uses `~/.cache/hncli/` on Linux. Falls back to a memory-only cache when no
    /// home directory can be determined.
    pub fn new() -> Self {
        match ProjectDirs::from("", "", "hncli") {
            Some(dirs) => Self::with_dir(dirs.cache_dir().to_path_buf()),
            None => {
                warn!("no cache directory available, caching in memory only");
                Self::in_memory()
            }
        }
    }

    /// Creates a cache backed by a custom directory and loads its files
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        let mut cache = Self {
            cache_dir: Some(cache_dir),
            entries: HashMap::new(),
        };
        cache.load_from_disk();
        cache
    }

    /// Creates a cache that never touches the filesystem
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Number of entries currently held in memory, fresh or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value for `key` if it was stored less than `ttl` ago
    pub fn get(&self, key: &str, ttl: Duration) -> Option<&Value> {
        self.get_at(key, ttl, now_secs())
    }

    /// Stores `value` under `key` and writes it to disk immediately
    pub fn set(&mut self, key: &str, value: Value) {
        self.set_at(key, value, now_secs());
    }

    /// Empties memory and deletes every cache file in the directory
    pub fn clear(&mut self) {
        self.entries.clear();

        let Some(dir) = &self.cache_dir else {
            return;
        };
        for path in cache_files(dir) {
            if let Err(e) = fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "could not delete cache file");
            }
        }
    }

    /// Removes every entry that is at least `ttl` old
    pub fn clear_expired(&mut self, ttl: Duration) {
        self.clear_expired_at(ttl, now_secs());
    }

    fn get_at(&self, key: &str, ttl: Duration, now: f64) -> Option<&Value> {
        let entry = self.entries.get(key)?;
        if entry.is_fresh(ttl, now) {
            debug!(key, "cache hit");
            Some(&entry.value)
        } else {
            debug!(key, "cache entry expired");
            None
        }
    }

    fn set_at(&mut self, key: &str, value: Value, now: f64) {
        let entry = CacheEntry {
            timestamp: now,
            value,
        };
        if let Err(e) = self.persist(key, &entry) {
            warn!(key, error = %e, "could not write cache file");
        }
        self.entries.insert(key.to_string(), entry);
    }

    fn clear_expired_at(&mut self, ttl: Duration, now: f64) {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_fresh(ttl, now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in expired {
            self.entries.remove(&key);
            if let Some(path) = self.cache_path(&key) {
                if let Err(e) = fs::remove_file(&path) {
                    debug!(path = %path.display(), error = %e, "could not delete expired cache file");
                }
            }
        }
    }

    /// Returns the path of the cache file for `key`
    fn cache_path(&self, key: &str) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{key}.{CACHE_FILE_EXTENSION}")))
    }

    /// Writes one entry as `[timestamp, value]`
    fn persist(&self, key: &str, entry: &CacheEntry) -> io::Result<()> {
        let (Some(dir), Some(path)) = (&self.cache_dir, self.cache_path(key)) else {
            return Ok(());
        };
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string(&(entry.timestamp, &entry.value))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }

    /// Loads every readable cache file, skipping malformed ones
    fn load_from_disk(&mut self) {
        let Some(dir) = self.cache_dir.clone() else {
            return;
        };
        for path in cache_files(&dir) {
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match read_entry(&path) {
                Ok(entry) => {
                    self.entries.insert(key.to_string(), entry);
                }
                Err(e) => debug!(path = %path.display(), error = %e, "skipping unreadable cache file"),
            }
        }
        debug!(count = self.entries.len(), dir = %dir.display(), "loaded cache from disk");
    }
}

/// Reads and parses a single `[timestamp, value]` cache file
fn read_entry(path: &Path) -> io::Result<CacheEntry> {
    let content = fs::read_to_string(path)?;
    let (timestamp, value): (f64, Value) = serde_json::from_str(&content)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(CacheEntry { timestamp, value })
}

/// Lists every `*.json` file in `dir`; a missing directory has no files
fn cache_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return Vec::new();
    };
    read_dir
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(CACHE_FILE_EXTENSION)
        })
        .collect()
}
