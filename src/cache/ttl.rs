//! In-memory cache with per-entry expiry
//!
//! Provides a `TtlCache` that stores cloneable values under string keys with an
//! expiry timestamp. Expired entries are removed when they are next looked up.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Wrapper struct for a cached value
#[derive(Debug)]
struct CacheEntry<T> {
    /// The cached value
    value: T,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Process-wide key/value store with lazy expiry
///
/// Every operation holds the lock only for the duration of a map access, so the
/// cache can be shared between request tasks behind an `Arc`.
#[derive(Debug)]
pub struct TtlCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TtlCache<T> {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<T>>> {
        // The map has no cross-entry invariants, so a poisoned lock is still usable.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stores `value` under `key`, replacing any existing entry
    ///
    /// # Arguments
    /// * `key` - Cache key
    /// * `value` - The value to cache
    /// * `ttl` - How long the entry should be considered fresh
    pub fn set(&self, key: impl Into<String>, value: T, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Utc::now() + ttl,
        };
        self.lock().insert(key.into(), entry);
    }

    /// Number of stored entries, including expired ones that have not been read yet
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> TtlCache<T> {
    /// Reads a value from the cache
    ///
    /// Returns `None` if the key is missing or its entry has expired. An expired
    /// entry is removed from the store as part of the lookup.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.lock();
        let entry = entries.get(key)?;

        if entry.is_expired(Utc::now()) {
            entries.remove(key);
            return None;
        }

        Some(entry.value.clone())
    }
}
