//! Local Cache Partition
//!
//! The bounded storage a single node keeps for each group.
//!
//! ## Components
//! - **`ByteView`**: immutable snapshot of a value handed back to callers.
//! - **`LruCache`**: single-threaded, byte-budgeted least-recently-used engine. Capacity is
//!   measured as `key.len() + value.byte_len()` summed over all entries; `0` means unbounded.
//! - **`SharedCache`**: the lock-guarded wrapper a `CacheGroup` owns, so concurrent
//!   requests never observe a half-applied insert or eviction.

pub mod byteview;
pub mod lru;

pub use byteview::ByteView;
pub use lru::{EvictionCallback, LruCache, Value};

use parking_lot::Mutex;

/// Thread-safe `LruCache<ByteView>`.
pub struct SharedCache {
    lru: Mutex<LruCache<ByteView>>,
}

impl SharedCache {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            lru: Mutex::new(LruCache::new(max_bytes)),
        }
    }

    /// The callback runs under the cache lock and must not call back into this cache.
    pub fn with_eviction_callback<F>(max_bytes: usize, on_evicted: F) -> Self
    where
        F: FnMut(&str, &ByteView) + Send + 'static,
    {
        Self {
            lru: Mutex::new(LruCache::with_eviction_callback(max_bytes, on_evicted)),
        }
    }

    pub fn get(&self, key: &str) -> Option<ByteView> {
        self.lru.lock().get(key).cloned()
    }

    pub fn add(&self, key: &str, value: ByteView) {
        self.lru.lock().add(key, value);
    }

    pub fn remove(&self, key: &str) -> bool {
        self.lru.lock().remove(key)
    }

    pub fn len(&self) -> usize {
        self.lru.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lru.lock().is_empty()
    }

    pub fn used_bytes(&self) -> usize {
        self.lru.lock().used_bytes()
    }
}
