use super::byteview::ByteView;

use ::lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// Called with each entry the store drops to get back under budget.
///
/// Runs after the store lock is released.
pub type EvictionCallback = Arc<dyn Fn(&str, &ByteView) + Send + Sync>;

/// Point-in-time counters of a [`BoundedCacheStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub entries: usize,
    pub bytes: u64,
    pub max_bytes: u64,
    pub evictions: u64,
}

struct StoreState {
    entries: LruCache<String, ByteView>,
    nbytes: u64,
    evictions: u64,
}

/// A byte-budgeted LRU store shared by every caller of one group.
///
/// `get` and `add` both take the same exclusive lock: a read reorders the
/// recency list, so there is no shared read path.
///
/// An entry heavier than the whole budget is accepted and then evicted on the
/// spot, together with everything older than it.
pub struct BoundedCacheStore {
    max_bytes: u64,
    state: Mutex<StoreState>,
    on_evicted: Option<EvictionCallback>,
}

fn weight(key: &str, value: &ByteView) -> u64 {
    (key.len() + value.len()) as u64
}

impl BoundedCacheStore {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            state: Mutex::new(StoreState {
                entries: LruCache::unbounded(),
                nbytes: 0,
                evictions: 0,
            }),
            on_evicted: None,
        }
    }

    pub fn with_eviction_callback(max_bytes: u64, on_evicted: EvictionCallback) -> Self {
        Self {
            on_evicted: Some(on_evicted),
            ..Self::new(max_bytes)
        }
    }

    /// Looks up `key`, promoting it to most recently used on a hit.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut state = self.state.lock();
        state.entries.get(key).cloned()
    }

    /// Inserts or overwrites `key`, then evicts until the budget holds.
    pub fn add(&self, key: &str, value: ByteView) {
        let added = weight(key, &value);
        let evicted = {
            let mut state = self.state.lock();
            if let Some(old) = state.entries.put(key.to_string(), value) {
                state.nbytes -= weight(key, &old);
            }
            state.nbytes += added;

            let mut evicted = Vec::new();
            while state.nbytes > self.max_bytes {
                let Some((old_key, old_value)) = state.entries.pop_lru() else {
                    break;
                };
                state.nbytes -= weight(&old_key, &old_value);
                state.evictions += 1;
                evicted.push((old_key, old_value));
            }
            evicted
        };

        if !evicted.is_empty() {
            tracing::debug!(count = evicted.len(), "evicted cache entries");
        }
        if let Some(on_evicted) = &self.on_evicted {
            for (key, value) in &evicted {
                on_evicted(key, value);
            }
        }
    }

    /// Removes `key` without counting it as an eviction.
    pub fn remove(&self, key: &str) -> Option<ByteView> {
        let mut state = self.state.lock();
        let value = state.entries.pop(key)?;
        state.nbytes -= weight(key, &value);
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total weight of the stored entries.
    pub fn bytes(&self) -> u64 {
        self.state.lock().nbytes
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn stats(&self) -> StoreStats {
        let state = self.state.lock();
        StoreStats {
            entries: state.entries.len(),
            bytes: state.nbytes,
            max_bytes: self.max_bytes,
            evictions: state.evictions,
        }
    }
}
