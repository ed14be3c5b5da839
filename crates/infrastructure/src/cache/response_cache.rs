//! LRU-backed [`ResponseCache`]: a single `Mutex<LruCache>` guarding
//! wire-encoded messages plus their expiry. A short critical section per
//! operation is enough even under concurrent access.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;

use rootward_application::ports::response_cache::CacheKey;
use rootward_application::ports::ResponseCache;

struct Entry {
    wire: Arc<[u8]>,
    expires_at: Instant,
}

pub struct LruResponseCache {
    inner: Mutex<LruCache<CacheKey, Entry>>,
}

impl LruResponseCache {
    /// `capacity` comes from `RootDnsConfig::cache_size` (default 3000).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl ResponseCache for LruResponseCache {
    fn get(&self, key: &CacheKey) -> Option<Arc<[u8]>> {
        let mut cache = self.inner.lock().unwrap();
        let entry = cache.get(key)?;
        if entry.expires_at < Instant::now() {
            cache.pop(key);
            return None;
        }
        Some(entry.wire.clone())
    }

    fn put(&self, key: CacheKey, wire: Arc<[u8]>, ttl: Duration) {
        let mut cache = self.inner.lock().unwrap();
        cache.put(
            key,
            Entry {
                wire,
                expires_at: Instant::now() + ttl,
            },
        );
    }
}
