//! Persistent response cache keyed by a digest of (model, prompt).
//!
//! The whole mapping lives in memory and is mirrored to one JSON file that is
//! rewritten in full after every insert.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::CacheError;

// How many keys `stats` reports
pub const SAMPLE_KEY_LIMIT: usize = 3;

/// Hex-encoded SHA-256 digest identifying a (model, prompt) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// One stored generation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub response: String,
    pub original_latency: f64, // seconds the remote call took
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub model: String,
}

/// Create a cache key (hash of model + prompt).
///
/// Each field is prefixed with its byte length so that `("a:b", "c")` and
/// `("a", "b:c")` never hash the same input. Strings are used as given.
pub fn derive_key(prompt: &str, model: &str) -> CacheKey {
    let mut hasher = Sha256::new();
    hasher.update((model.len() as u64).to_le_bytes());
    hasher.update(model.as_bytes());
    hasher.update((prompt.len() as u64).to_le_bytes());
    hasher.update(prompt.as_bytes());
    CacheKey(format!("{:x}", hasher.finalize()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub file_exists: bool,
    pub file_size_bytes: u64,
    pub sample_keys: Vec<CacheKey>,
}

pub struct ResponseCache {
    path: PathBuf,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl ResponseCache {
    /// Empty cache bound to `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: HashMap::new(),
        }
    }

    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut cache = Self::new(path);
        cache.load();
        cache
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the in-memory mapping with the backing file's contents.
    ///
    /// A missing file gives an empty cache. An unreadable or corrupt file is
    /// reported with `warn!` and also gives an empty cache. Entries not yet
    /// saved are discarded either way.
    pub fn load(&mut self) {
        match read_entries(&self.path) {
            Ok(Some(entries)) => {
                info!(
                    count = entries.len(),
                    path = %self.path.display(),
                    "Loaded cached responses from disk"
                );
                self.entries = entries;
            }
            Ok(None) => {
                info!(path = %self.path.display(), "No existing cache file found, starting fresh");
                self.entries.clear();
            }
            Err(e) => {
                warn!(error = %e, "Could not load cache file, starting empty");
                self.entries.clear();
            }
        }
    }

    /// Overwrite the backing file with the whole mapping.
    ///
    /// The new content is written to a temp file next to the target and
    /// renamed over it.
    pub fn save(&self) -> Result<(), CacheError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| CacheError::write(&self.path, e))?;

        let data = serde_json::to_vec(&self.entries).map_err(|e| CacheError::write(&self.path, e))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CacheError::write(&self.path, e))?;
        tmp.write_all(&data).map_err(|e| CacheError::write(&self.path, e))?;
        tmp.as_file().sync_all().map_err(|e| CacheError::write(&self.path, e))?;
        tmp.persist(&self.path).map_err(|e| CacheError::write(&self.path, e.error))?;

        debug!(
            count = self.entries.len(),
            path = %self.path.display(),
            "Saved responses to cache file"
        );
        Ok(())
    }

    pub fn get(&self, prompt: &str, model: &str) -> Option<&CacheEntry> {
        self.entries.get(&derive_key(prompt, model))
    }

    /// Insert (or overwrite) the entry for `(prompt, model)` and flush to disk.
    ///
    /// If the flush fails the entry is still held in memory. A non-finite
    /// latency is rejected before anything is inserted.
    pub fn put(
        &mut self,
        prompt: &str,
        model: &str,
        response: impl Into<String>,
        original_latency: f64,
    ) -> Result<(), CacheError> {
        if !original_latency.is_finite() {
            return Err(CacheError::InvalidLatency(original_latency));
        }
        let key = derive_key(prompt, model);
        let entry = CacheEntry {
            response: response.into(),
            original_latency,
            // whole milliseconds, so the entry survives a save/load unchanged
            created_at: Utc::now().trunc_subsecs(3),
            model: model.to_string(),
        };
        debug!(key = %&key.as_str()[..8], model, "Caching response");
        self.entries.insert(key, entry);
        self.save()
    }

    /// Drop every entry and delete the backing file.
    ///
    /// The mapping is emptied even when the delete fails.
    pub fn clear(&mut self) -> Result<(), CacheError> {
        self.entries.clear();
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Cache cleared from memory and disk");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::PersistenceDelete {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    pub fn stats(&self) -> CacheStats {
        let (file_exists, file_size_bytes) = match fs::metadata(&self.path) {
            Ok(meta) if meta.is_file() => (true, meta.len()),
            _ => (false, 0),
        };

        let mut keys: Vec<&CacheKey> = self.entries.keys().collect();
        keys.sort();

        CacheStats {
            size: self.entries.len(),
            file_exists,
            file_size_bytes,
            sample_keys: keys.into_iter().take(SAMPLE_KEY_LIMIT).cloned().collect(),
        }
    }
}

// Ok(None) means there is no file yet
fn read_entries(path: &Path) -> Result<Option<HashMap<CacheKey, CacheEntry>>, CacheError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CacheError::read(path, e)),
    };
    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|e| CacheError::read(path, e))
}
