//! Bounded document cache with least-recently-used eviction
//!
//! This module provides the in-memory cache that lets the fetcher skip the
//! network entirely for URLs it has already resolved. Entries are shared as
//! `Arc<Document>` so a cache hit never clones page content, and eviction is
//! purely capacity-driven (no time-based expiration).

use crate::document::Document;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Default number of documents kept in memory
pub const DEFAULT_CAPACITY: usize = 500;

/// Thread-safe URL -> document cache with a fixed capacity
///
/// The cache is the sole owner of its entries; callers receive cloned `Arc`
/// handles. A `get` refreshes the entry's recency, so the entry evicted when
/// the cache is full is always the least-recently-touched one. Concurrent
/// lookups racing an insert for the same key are safe: last write wins.
pub struct DocumentCache {
    entries: Mutex<LruCache<String, Arc<Document>>>,
}

impl DocumentCache {
    /// Creates a cache holding at most `capacity` documents
    ///
    /// A capacity of zero is treated as one; configuration validation
    /// rejects it before it gets here.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Looks up a document by URL, refreshing its recency on a hit
    pub async fn get(&self, url: &str) -> Option<Arc<Document>> {
        let mut entries = self.entries.lock().await;
        entries.get(url).cloned()
    }

    /// Stores a document under the given URL
    ///
    /// Evicts the least-recently-used entry first when the cache is at
    /// capacity. Inserting an already-present key replaces the value and
    /// counts as a touch.
    pub async fn insert(&self, url: &str, document: Arc<Document>) {
        let mut entries = self.entries.lock().await;
        if let Some((evicted, _)) = entries.push(url.to_string(), document) {
            if evicted != url {
                tracing::trace!("evicted {} from document cache", evicted);
            }
        }
    }

    /// Returns whether a document is cached for the URL, without touching it
    pub async fn contains(&self, url: &str) -> bool {
        let entries = self.entries.lock().await;
        entries.contains(url)
    }

    /// Number of cached documents
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.len()
    }

    /// Returns whether the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// The configured capacity
    pub async fn capacity(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.cap().get()
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
