//! Loaded-dataset cache.
//!
//! The cache is an explicit handle owned by the caller. A dataset is loaded at
//! most once per source identity; a change in the file's length or
//! modification time reloads it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::debug;

use crate::dataset::{self, Dataset};
use crate::error::LoadError;
use crate::logging::event_names;

/// Identity of a source file at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceStamp {
    len: u64,
    modified: Option<SystemTime>,
}

impl SourceStamp {
    fn read(path: &Path) -> Result<Self, LoadError> {
        let meta = std::fs::metadata(path).map_err(|e| LoadError::io(path, e))?;
        Ok(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

#[derive(Debug)]
struct CacheEntry {
    stamp: SourceStamp,
    dataset: Arc<Dataset>,
}

/// Cache of loaded datasets keyed by canonical path.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, loading it on first use or when
    /// the file changed since it was cached.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, LoadError> {
        let key = path.canonicalize().map_err(|e| LoadError::io(path, e))?;
        let stamp = SourceStamp::read(&key)?;

        if let Some(entry) = self.entries.get(&key) {
            if entry.stamp == stamp {
                debug!(
                    event = event_names::CACHE_HIT,
                    path = %key.display(),
                    "Dataset cache hit"
                );
                return Ok(Arc::clone(&entry.dataset));
            }
            debug!(
                event = event_names::CACHE_STALE,
                path = %key.display(),
                "Source changed, reloading"
            );
        }

        let dataset = Arc::new(dataset::load(&key)?);
        self.entries.insert(
            key,
            CacheEntry {
                stamp,
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    /// Drop the entry for `path`. Returns whether one was cached.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let key = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
