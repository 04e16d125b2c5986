//! Exposure-table caching with version validation.
//!
//! Tables are keyed by document URL and tagged with the document version and
//! forest generation they were computed from. A lookup with any other stamp
//! misses, so a table computed from a replaced tree is never served even when
//! the replacement kept the version number.

use super::exposure::ExposureTable;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use url::Url;

#[derive(Clone, Debug)]
struct CachedExposure {
    version: i32,
    generation: u64,
    table: ExposureTable,
}

/// Thread-safe exposure-table cache.
pub struct ExposureCache {
    cache: DashMap<Url, CachedExposure>,
}

impl ExposureCache {
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    /// Store the table computed from one stored revision of a document.
    ///
    /// An entry from a newer generation is kept; readers on an old snapshot
    /// cannot evict it.
    pub fn store(&self, uri: Url, version: i32, generation: u64, table: ExposureTable) {
        let cached = CachedExposure {
            version,
            generation,
            table,
        };
        match self.cache.entry(uri) {
            Entry::Occupied(mut entry) => {
                if entry.get().generation <= generation {
                    entry.insert(cached);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(cached);
            }
        }
    }

    /// Get the cached table if it was computed from this exact revision.
    pub fn get_if_valid(&self, uri: &Url, version: i32, generation: u64) -> Option<ExposureTable> {
        self.cache.get(uri).and_then(|entry| {
            if entry.version == version && entry.generation == generation {
                Some(entry.table.clone())
            } else {
                None
            }
        })
    }

    /// Drop the cached table for a document (e.g. on close).
    pub fn remove(&self, uri: &Url) {
        self.cache.remove(uri);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for ExposureCache {
    fn default() -> Self {
        Self::new()
    }
}
