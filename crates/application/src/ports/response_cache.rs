use equivalent::Equivalent;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

/// LRU cache key: the queried TLD label, plus the RR type when the query
/// targets the apex (keyed by `tld`, or `tld;type` at the apex). The
/// owned/borrowed split lets lookups avoid allocating a new key per query.
#[derive(Clone, Debug, Eq)]
pub struct CacheKey {
    pub label: Arc<str>,
    pub qtype: Option<u16>,
}

impl CacheKey {
    pub fn new(label: Arc<str>, qtype: Option<u16>) -> Self {
        Self { label, qtype }
    }
}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
        self.qtype.hash(state);
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.qtype == other.qtype && self.label == other.label
    }
}

#[derive(Debug)]
pub struct BorrowedKey<'a> {
    pub label: &'a str,
    pub qtype: Option<u16>,
}

impl<'a> Hash for BorrowedKey<'a> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
        self.qtype.hash(state);
    }
}

impl<'a> Equivalent<CacheKey> for BorrowedKey<'a> {
    fn equivalent(&self, key: &CacheKey) -> bool {
        self.qtype == key.qtype && self.label == key.label.as_ref()
    }
}

/// External port over the wire-message cache.
/// `_synth.` pointer answers bypass this entirely.
pub trait ResponseCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<Arc<[u8]>>;
    fn put(&self, key: CacheKey, wire: Arc<[u8]>, ttl: Duration);
}
