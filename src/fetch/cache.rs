// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Extraction result caching for URL requests
//!
//! LRU bounded with an age-based TTL. Entry age is measured from insertion;
//! reads refresh recency but never extend the TTL.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::extraction::ExtractionEngine;

/// Cached extraction for a normalised URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedExtraction {
    pub title: String,
    pub text: String,
    pub engine: ExtractionEngine,
    pub score: f64,
}

#[derive(Debug)]
struct CacheEntry {
    value: CachedExtraction,
    stored_at: Instant,
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionCacheStats {
    pub size: usize,
    pub max_size: usize,
    pub ttl_secs: u64,
}

pub struct ExtractionCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
    max_entries: NonZeroUsize,
}

impl ExtractionCache {
    /// Create a new cache
    ///
    /// # Arguments
    /// * `ttl_secs` - Time-to-live for entries in seconds
    /// * `max_entries` - Capacity before least recently used entries are evicted (min 1)
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        let max_entries = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(max_entries)),
            ttl: Duration::from_secs(ttl_secs),
            max_entries,
        }
    }

    /// Get a live entry; expired entries are removed
    pub fn get(&self, key: &str) -> Option<CachedExtraction> {
        let mut entries = self.entries.lock().ok()?;

        let expired = match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= self.ttl => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
        }
        None
    }

    pub fn insert(&self, key: &str, value: CachedExtraction) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(
                key.to_string(),
                CacheEntry {
                    value,
                    stored_at: Instant::now(),
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> ExtractionCacheStats {
        ExtractionCacheStats {
            size: self.len(),
            max_size: self.max_entries.get(),
            ttl_secs: self.ttl.as_secs(),
        }
    }
}
