//! Per-type signature indexes and the process-wide method registry.
//!
//! One [`MethodIndex`] exists per registered type, built at most once and
//! shared by reference for the life of the process. It carries an exact map
//! (unique owner per key), an ordinal-bucketed map (ties permitted; they
//! are broken at lookup time, not build time), and the remote-eligible
//! subset advertised to other processes.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use huddle_core::descriptor::{OperationHandler, TypeDescriptor};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::DispatchConfig;
use crate::error::ConfigError;
use crate::key::{box_param, exact_key, ordinal_key};

// ---------------------------------------------------------------------------
// OperationSignature
// ---------------------------------------------------------------------------

/// A fully resolved, invocable operation signature. Immutable after the
/// index build that created it.
#[derive(Clone)]
pub struct OperationSignature {
    /// Owning type name.
    pub type_name: String,
    /// Operation name.
    pub name: String,
    /// Canonical (boxed) parameter type names, in order.
    pub param_types: Vec<String>,
    /// The invocable descriptor.
    pub handler: OperationHandler,
}

impl OperationSignature {
    #[must_use]
    pub fn exact_key(&self) -> String {
        exact_key(&self.type_name, &self.name, &self.param_types)
    }

    #[must_use]
    pub fn ordinal_key(&self) -> String {
        ordinal_key(&self.type_name, &self.name, self.param_types.len())
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.param_types.len()
    }
}

impl fmt::Debug for OperationSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationSignature")
            .field("key", &self.exact_key())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// TypeGraph
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct TypeNode {
    /// Flattened, transitive ancestor set.
    ancestors: HashSet<String>,
    /// Capability (interface-like) types carry no cross-process identity.
    capability: bool,
}

/// Registered type relationships backing assignability checks.
#[derive(Debug, Default)]
pub struct TypeGraph {
    nodes: HashMap<String, TypeNode>,
}

impl TypeGraph {
    fn insert_concrete(&mut self, name: &str, ancestors: &[String]) {
        let node = self.nodes.entry(name.to_string()).or_default();
        node.capability = false;
        node.ancestors.extend(ancestors.iter().cloned());
    }

    fn insert_capability(&mut self, name: &str) {
        self.nodes.entry(name.to_string()).or_default().capability = true;
    }

    #[must_use]
    pub fn is_capability(&self, name: &str) -> bool {
        self.nodes.get(name).is_some_and(|n| n.capability)
    }

    /// Assignability: identical type, or `arg` is a registered descendant of
    /// `declared`.
    #[must_use]
    pub fn is_assignable(&self, declared: &str, arg: &str) -> bool {
        declared == arg
            || self
                .nodes
                .get(arg)
                .is_some_and(|n| n.ancestors.contains(declared))
    }

    fn clear(&mut self) {
        self.nodes.clear();
    }
}

// ---------------------------------------------------------------------------
// MethodIndex
// ---------------------------------------------------------------------------

/// One type's operation indexes.
#[derive(Debug, Default)]
pub struct MethodIndex {
    /// Exact signature key -> unique operation. `DashMap` because the
    /// resolver caches discovered ordinal matches here after build.
    exact: DashMap<String, Arc<OperationSignature>>,
    /// Ordinal key -> candidates sharing name and arity, sorted by exact
    /// key for deterministic iteration. Never mutated after build.
    ordinal: BTreeMap<String, Vec<Arc<OperationSignature>>>,
    /// Remote-eligible subset of `exact`. Never mutated after build.
    remote: BTreeMap<String, Arc<OperationSignature>>,
}

impl MethodIndex {
    #[must_use]
    pub fn exact(&self, key: &str) -> Option<Arc<OperationSignature>> {
        self.exact.get(key).map(|e| e.value().clone())
    }

    /// Cache a resolver-discovered match under its exact key.
    pub fn cache_exact(&self, key: String, sig: Arc<OperationSignature>) {
        self.exact.insert(key, sig);
    }

    #[must_use]
    pub fn candidates(&self, ordinal_key: &str) -> &[Arc<OperationSignature>] {
        self.ordinal.get(ordinal_key).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn remote(&self) -> &BTreeMap<String, Arc<OperationSignature>> {
        &self.remote
    }

    #[must_use]
    pub fn exact_len(&self) -> usize {
        self.exact.len()
    }
}

// ---------------------------------------------------------------------------
// MethodRegistry
// ---------------------------------------------------------------------------

/// Registry statistics, diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStatistics {
    pub registered_types: usize,
    pub operations: usize,
    pub remote_operations: usize,
}

/// Process-wide registry of per-type signature indexes.
///
/// Owned by the hosting runtime and shared by reference with all
/// collaborators; there is no implicit global instance. Registration for a
/// given type is safe under concurrent callers: the index is built off to
/// the side and published atomically, so readers never observe a partially
/// built entry.
pub struct MethodRegistry {
    types: DashMap<String, Arc<MethodIndex>>,
    graph: RwLock<TypeGraph>,
    excluded: HashSet<String>,
    universal_bases: HashSet<String>,
}

impl MethodRegistry {
    #[must_use]
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            types: DashMap::new(),
            graph: RwLock::new(TypeGraph::default()),
            excluded: config.excluded_operations.iter().cloned().collect(),
            universal_bases: config.universal_bases.iter().cloned().collect(),
        }
    }

    /// Register a capability (interface-like) type. Operations with a
    /// capability-typed parameter are never remote-eligible.
    pub fn register_capability(&self, name: &str) {
        self.graph.write().insert_capability(name);
    }

    /// Register a plain value type's ancestry: types that appear as
    /// argument values but expose no operations of their own.
    pub fn register_value_type(&self, name: &str, ancestors: &[&str]) {
        let ancestors: Vec<String> = ancestors.iter().map(ToString::to_string).collect();
        self.graph.write().insert_concrete(name, &ancestors);
    }

    /// Build and publish the signature index for a type. Idempotent:
    /// re-registration is a logged no-op.
    ///
    /// # Errors
    ///
    /// `ConfigError` if any operation's parameter metadata is ill-formed;
    /// the failure is scoped to this type and nothing is published.
    pub fn register_type(&self, desc: &TypeDescriptor) -> Result<(), ConfigError> {
        if self.types.contains_key(&desc.type_name) {
            info!(type_name = %desc.type_name, "already indexed, skipping");
            return Ok(());
        }

        let index = self.build_index(desc)?;
        self.graph
            .write()
            .insert_concrete(&desc.type_name, &desc.ancestors);
        self.types
            .entry(desc.type_name.clone())
            .or_insert_with(|| Arc::new(index));
        Ok(())
    }

    fn build_index(&self, desc: &TypeDescriptor) -> Result<MethodIndex, ConfigError> {
        let mut index = MethodIndex::default();
        let graph = self.graph.read();

        for op in &desc.operations {
            let mut boxed = Vec::with_capacity(op.param_types.len());
            for raw in &op.param_types {
                let name = box_param(raw).map_err(|source| ConfigError::BadOperation {
                    type_name: desc.type_name.clone(),
                    operation: op.name.clone(),
                    source: Box::new(source),
                })?;
                boxed.push(name.to_string());
            }

            let sig = Arc::new(OperationSignature {
                type_name: desc.type_name.clone(),
                name: op.name.clone(),
                param_types: boxed,
                handler: op.handler.clone(),
            });

            // Ties on the ordinal key are expected and meaningful: overloads
            // distinguished only by argument count have no stable resolution
            // until call time, so buckets append and never overwrite.
            index
                .ordinal
                .entry(sig.ordinal_key())
                .or_default()
                .push(sig.clone());

            let declaring = op.declaring_type.as_deref().unwrap_or(&desc.type_name);
            let remote_eligible = !self.excluded.contains(&op.name)
                && !self.universal_bases.contains(declaring)
                && !sig.param_types.iter().any(|p| graph.is_capability(p));
            if remote_eligible {
                index.remote.insert(sig.exact_key(), sig.clone());
            }

            debug!(key = %sig.exact_key(), "indexed operation");
            index.exact.insert(sig.exact_key(), sig);
        }

        for bucket in index.ordinal.values_mut() {
            bucket.sort_by_key(|sig| sig.exact_key());
        }

        info!(
            type_name = %desc.type_name,
            operations = index.exact.len(),
            ordinal_signatures = index.ordinal.len(),
            "indexed type"
        );
        Ok(index)
    }

    #[must_use]
    pub fn index_of(&self, type_name: &str) -> Option<Arc<MethodIndex>> {
        self.types.get(type_name).map(|e| e.value().clone())
    }

    /// Ordinal candidates for `(type, method, arity)`, in stable order.
    /// Empty when the type or the ordinal key is unknown.
    #[must_use]
    pub fn ordinal_candidates(
        &self,
        type_name: &str,
        method: &str,
        arity: usize,
    ) -> Vec<Arc<OperationSignature>> {
        self.index_of(type_name).map_or_else(Vec::new, |index| {
            index.candidates(&ordinal_key(type_name, method, arity)).to_vec()
        })
    }

    /// Remote-eligible operations for capability advertisement.
    #[must_use]
    pub fn remote_operations(
        &self,
        type_name: &str,
    ) -> Option<BTreeMap<String, Arc<OperationSignature>>> {
        self.index_of(type_name).map(|index| index.remote().clone())
    }

    /// Read access to the type graph, for assignability checks.
    pub fn graph(&self) -> parking_lot::RwLockReadGuard<'_, TypeGraph> {
        self.graph.read()
    }

    /// Administrative clear-all: full registry replacement, not incremental.
    /// Callers must exclude concurrent resolve/invoke activity.
    pub fn clear(&self) {
        self.types.clear();
        self.graph.write().clear();
    }

    #[must_use]
    pub fn statistics(&self) -> RegistryStatistics {
        let mut operations = 0;
        let mut remote_operations = 0;
        for entry in &self.types {
            operations += entry.value().exact_len();
            remote_operations += entry.value().remote().len();
        }
        RegistryStatistics {
            registered_types: self.types.len(),
            operations,
            remote_operations,
        }
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new(&DispatchConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
