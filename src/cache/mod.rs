//! In-memory caching built on Moka.
//!
//! The filter repository keeps two caches in front of MongoDB: the per-chat
//! keyword list (consulted on every group message) and individual filter
//! records keyed by `(chat_id, keyword)`. Writes invalidate, reads refill.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

/// Capacity and expiry settings for one cache instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries.
    pub max_capacity: u64,

    /// Time-to-live: entries are evicted this long after insertion.
    pub ttl: Option<Duration>,

    /// Time-to-idle: entries are evicted when unused for this long.
    pub tti: Option<Duration>,
}

impl CacheConfig {
    /// Per-chat keyword lists. Hit on every group message, so they live a
    /// while; writes invalidate them anyway.
    pub fn keyword_lists() -> Self {
        Self {
            max_capacity: 5_000,
            ttl: Some(Duration::from_secs(600)),
            tti: None,
        }
    }

    /// Individual filter records, fetched after a keyword match.
    pub fn records() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)),
            tti: Some(Duration::from_secs(120)),
        }
    }
}

/// A typed wrapper over Moka's sync cache.
///
/// Cloning is cheap and shares the underlying cache.
pub struct TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Cache<K, V>>,
}

// Manual Clone: a derive would also demand K: Clone.
impl<K, V> Clone for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Build a cache from the given config.
    pub fn new(config: CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        Self {
            inner: Arc::new(builder.build()),
        }
    }

    /// Insert a key-value pair.
    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    /// Get a value if present and not expired.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key)
    }

    /// Drop a single entry.
    pub fn invalidate(&self, key: &K) {
        self.inner.invalidate(key);
    }
}

impl<K, V> std::fmt::Debug for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedCache")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}
