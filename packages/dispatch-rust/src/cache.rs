//! Bounded, recency-evicted cache of scan-discovered best-effort matches.
//!
//! The exhaustive scan is the invoker's last resort; whatever it finds is
//! remembered here so a repeat call with the same shape skips the scan.
//! The cache sits behind every fallback-path invocation, so all access is a
//! single small critical section: one map mutation plus a recency touch.
//! A miss never blocks a retry; callers always fall back to the scan.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::index::OperationSignature;

/// Cache key: concrete target type, operation name, and the derived
/// argument type signature (`null` for typeless slots).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FallbackKey {
    pub type_name: String,
    pub method: String,
    pub arg_signature: String,
}

impl FallbackKey {
    #[must_use]
    pub fn new(type_name: &str, method: &str, arg_type_names: &[Option<&str>]) -> Self {
        let arg_signature = arg_type_names
            .iter()
            .map(|t| t.unwrap_or("null"))
            .collect::<Vec<_>>()
            .join(",");
        Self {
            type_name: type_name.to_string(),
            method: method.to_string(),
            arg_signature,
        }
    }
}

/// Shared LRU cache over all types.
#[derive(Debug)]
pub struct FallbackCache {
    entries: Mutex<LruCache<FallbackKey, Arc<OperationSignature>>>,
}

impl FallbackCache {
    /// A zero capacity is clamped to a single entry.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up and touch an entry's recency.
    #[must_use]
    pub fn get(&self, key: &FallbackKey) -> Option<Arc<OperationSignature>> {
        self.entries.lock().get(key).cloned()
    }

    /// Insert, evicting the least-recently-used entry at capacity.
    pub fn insert(&self, key: FallbackKey, sig: Arc<OperationSignature>) {
        self.entries.lock().put(key, sig);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
