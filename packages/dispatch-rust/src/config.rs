/// Configuration for the dispatch core.
///
/// Controls the fallback cache bound, the path codec's API tag, and the
/// process-wide exclusion rules applied when building signature indexes.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Bound on the shared LRU fallback cache.
    pub fallback_cache_capacity: usize,
    /// Expected literal for the first path segment (e.g. `/api/...`).
    pub api_tag: String,
    /// Operation names never advertised for remote invocation, shared
    /// across all types (entry points, metadata accessors).
    pub excluded_operations: Vec<String>,
    /// Universal base scopes whose declared operations are not
    /// remote-eligible.
    pub universal_bases: Vec<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            fallback_cache_capacity: 128,
            api_tag: "api".to_string(),
            excluded_operations: vec!["main".to_string(), "getMetaData".to_string()],
            universal_bases: vec!["Service".to_string(), "Object".to_string()],
        }
    }
}
