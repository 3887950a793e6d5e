//! Resolution cache
//!
//! Unbounded memoization of track id -> resolution. Entries are never
//! evicted or recomputed for the lifetime of the process.

use dashmap::DashMap;

use crate::model::Resolution;

/// Process-wide cache of track resolutions
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: DashMap<String, Resolution>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached resolution
    pub fn get(&self, track_id: &str) -> Option<Resolution> {
        self.entries.get(track_id).map(|r| r.value().clone())
    }

    /// Cache a resolution, replacing any previous value for the same id
    pub fn set(&self, track_id: &str, resolution: Resolution) {
        self.entries.insert(track_id.to_string(), resolution);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        for entry in self.entries.iter() {
            stats.entry_count += 1;
            match entry.value() {
                Resolution::Url(_) => stats.resolved += 1,
                Resolution::Unavailable => stats.unavailable += 1,
                Resolution::TimedOut => stats.timed_out += 1,
            }
        }
        stats
    }
}

/// Cache statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub entry_count: usize,
    pub resolved: usize,
    pub unavailable: usize,
    pub timed_out: usize,
}
