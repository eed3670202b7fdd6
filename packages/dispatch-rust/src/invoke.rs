//! Two-tier invocation.
//!
//! The fast path dispatches on the exact signature derived from the
//! arguments' runtime types. Cross-binding and wire-decoded calls routinely
//! present boxed, widened, or substituted-supertype arguments that
//! legitimately miss the exact key even though a compatible operation
//! exists; those probe the shared fallback cache and, as a last resort,
//! scan every candidate with matching name and arity, accepting the first
//! whose invocation completes. Individual candidate failures are swallowed
//! so one rejection never blocks the next candidate; only the last failure
//! is kept for the final diagnostic.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use huddle_core::{Message, Outbox, ServiceInstance, Value};
use tracing::{debug, warn};

use crate::cache::{FallbackCache, FallbackKey};
use crate::config::DispatchConfig;
use crate::error::InvocationError;
use crate::index::MethodRegistry;
use crate::key::exact_key;

/// Synchronous operation dispatcher.
///
/// Performs no I/O and introduces no parallelism; it blocks only on the
/// target operation's own execution.
pub struct Invoker {
    registry: Arc<MethodRegistry>,
    fallback: FallbackCache,
    outbox: Option<Arc<dyn Outbox>>,
    scans: AtomicU64,
}

impl Invoker {
    #[must_use]
    pub fn new(registry: Arc<MethodRegistry>, config: &DispatchConfig) -> Self {
        Self {
            registry,
            fallback: FallbackCache::new(config.fallback_cache_capacity),
            outbox: None,
            scans: AtomicU64::new(0),
        }
    }

    /// Attach a completion notification sink.
    #[must_use]
    pub fn with_outbox(mut self, outbox: Arc<dyn Outbox>) -> Self {
        self.outbox = Some(outbox);
        self
    }

    /// Invoke `method` on the target instance.
    ///
    /// # Errors
    ///
    /// `InvocationError` when a located operation's execution fails, or the
    /// exhaustive scan finds no invokable candidate.
    pub fn invoke(
        &self,
        target: &dyn ServiceInstance,
        method: &str,
        args: &[Value],
    ) -> Result<Value, InvocationError> {
        let type_name = target.type_name();
        let derived: Vec<Option<&str>> = args.iter().map(Value::type_name).collect();

        // Fast path: exact dispatch. A null-valued argument has no derivable
        // type, so any null slot disables this tier.
        if let Some(typed) = derived.iter().copied().collect::<Option<Vec<&str>>>() {
            if let Some(index) = self.registry.index_of(type_name) {
                let key = exact_key(type_name, method, &typed);
                if let Some(sig) = index.exact(&key) {
                    return match (sig.handler)(target, args) {
                        Ok(result) => {
                            self.notify(method, &result);
                            Ok(result)
                        }
                        // Located but threw: the target operation's failure,
                        // never masked by further searching.
                        Err(err) => Err(self.failure(method, args, Some(err))),
                    };
                }
            }
        }

        let fkey = FallbackKey::new(type_name, method, &derived);
        if let Some(sig) = self.fallback.get(&fkey) {
            match (sig.handler)(target, args) {
                Ok(result) => {
                    self.notify(method, &result);
                    return Ok(result);
                }
                Err(err) => {
                    warn!(key = %sig.exact_key(), error = %err, "cached fallback entry failed, rescanning");
                }
            }
        }

        self.scans.fetch_add(1, Ordering::Relaxed);
        let mut last_failure = None;
        for sig in self
            .registry
            .ordinal_candidates(type_name, method, args.len())
        {
            match (sig.handler)(target, args) {
                Ok(result) => {
                    debug!(key = %sig.exact_key(), "scan located invokable candidate");
                    self.fallback.insert(fkey, sig.clone());
                    self.notify(method, &result);
                    return Ok(result);
                }
                Err(err) => {
                    debug!(key = %sig.exact_key(), error = %err, "candidate rejected, trying next");
                    last_failure = Some(err);
                }
            }
        }

        Err(self.failure(method, args, last_failure))
    }

    fn notify(&self, method: &str, result: &Value) {
        if let Some(outbox) = &self.outbox {
            outbox.send(Message::callback(method, result.clone()));
        }
    }

    fn failure(
        &self,
        method: &str,
        args: &[Value],
        source: Option<anyhow::Error>,
    ) -> InvocationError {
        let arg_types = args
            .iter()
            .map(Value::describe_type)
            .collect::<Vec<_>>()
            .join(", ");
        InvocationError {
            method: method.to_string(),
            arity: args.len(),
            arg_types,
            source,
        }
    }

    /// Number of exhaustive scans performed (fallback-path instrumentation).
    #[must_use]
    pub fn scans_performed(&self) -> u64 {
        self.scans.load(Ordering::Relaxed)
    }

    /// The shared fallback cache, for diagnostics and administrative clears.
    #[must_use]
    pub fn fallback(&self) -> &FallbackCache {
        &self.fallback
    }

    /// Administrative clear of the fallback cache. Entries never block a
    /// retry; subsequent misses fall back to the full scan.
    pub fn clear_cache(&self) {
        self.fallback.clear();
    }
}
