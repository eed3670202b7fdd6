//! Explicit per-type operation tables.
//!
//! The framework cannot introspect a type's operations at runtime, so every
//! service type ships a [`TypeDescriptor`]: the complete table of publicly
//! invocable operations, *including inherited ones*. Ancestor-defined
//! operations are listed identically to directly declared ones; the
//! dispatch registry never special-cases inheritance. Descriptors are built
//! once (usually in a `descriptor()` associated function on the service
//! type) and handed to the registry.

use std::fmt;
use std::sync::Arc;

use crate::traits::ServiceInstance;
use crate::types::Value;

/// Invocable descriptor for a single operation: validates/coerces its
/// arguments and executes against the target instance.
///
/// A handler failure on the scan path is treated as "this candidate does not
/// accept these arguments", so handlers should fail fast on argument
/// mismatches rather than panic.
pub type OperationHandler =
    Arc<dyn Fn(&dyn ServiceInstance, &[Value]) -> anyhow::Result<Value> + Send + Sync>;

/// One publicly invocable operation on a service type.
#[derive(Clone)]
pub struct OperationDef {
    /// Operation name.
    pub name: String,
    /// Declared parameter type names, in order. May use primitive scalar
    /// names (`i32`, `bool`, ...); the registry boxes them when keying.
    pub param_types: Vec<String>,
    /// Scope that declared this operation. `None` means the owning type
    /// itself; inherited operations carry their ancestor scope.
    pub declaring_type: Option<String>,
    /// The invocable descriptor.
    pub handler: OperationHandler,
}

impl OperationDef {
    pub fn new<F>(name: &str, param_types: &[&str], handler: F) -> Self
    where
        F: Fn(&dyn ServiceInstance, &[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            param_types: param_types.iter().map(ToString::to_string).collect(),
            declaring_type: None,
            handler: Arc::new(handler),
        }
    }

    /// Mark this operation as declared by an ancestor scope.
    #[must_use]
    pub fn declared_by(mut self, scope: &str) -> Self {
        self.declaring_type = Some(scope.to_string());
        self
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.param_types.len()
    }
}

impl fmt::Debug for OperationDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDef")
            .field("name", &self.name)
            .field("param_types", &self.param_types)
            .field("declaring_type", &self.declaring_type)
            .finish_non_exhaustive()
    }
}

/// The complete operation table for one service type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// Canonical type name.
    pub type_name: String,
    /// Transitive ancestor scopes, nearest first.
    pub ancestors: Vec<String>,
    /// Every publicly invocable operation, inherited ones included.
    pub operations: Vec<OperationDef>,
}

impl TypeDescriptor {
    #[must_use]
    pub fn builder(type_name: &str) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder {
            type_name: type_name.to_string(),
            ancestors: Vec::new(),
            operations: Vec::new(),
        }
    }
}

/// Builder for [`TypeDescriptor`].
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    type_name: String,
    ancestors: Vec<String>,
    operations: Vec<OperationDef>,
}

impl TypeDescriptorBuilder {
    /// Add an ancestor scope (nearest first).
    #[must_use]
    pub fn ancestor(mut self, name: &str) -> Self {
        self.ancestors.push(name.to_string());
        self
    }

    /// Add a directly declared operation.
    #[must_use]
    pub fn operation(mut self, op: OperationDef) -> Self {
        self.operations.push(op);
        self
    }

    /// Inherit an ancestor descriptor wholesale: its type becomes an
    /// ancestor scope and its operations are copied in, tagged with their
    /// declaring scope so remote-eligibility screening can see where each
    /// operation came from.
    #[must_use]
    pub fn inherit(mut self, parent: &TypeDescriptor) -> Self {
        self.ancestors.push(parent.type_name.clone());
        for a in &parent.ancestors {
            if !self.ancestors.contains(a) {
                self.ancestors.push(a.clone());
            }
        }
        for op in &parent.operations {
            let mut inherited = op.clone();
            if inherited.declaring_type.is_none() {
                inherited.declaring_type = Some(parent.type_name.clone());
            }
            self.operations.push(inherited);
        }
        self
    }

    #[must_use]
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor {
            type_name: self.type_name,
            ancestors: self.ancestors,
            operations: self.operations,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;

    struct Clock;

    impl ServiceInstance for Clock {
        fn type_name(&self) -> &str {
            "Clock"
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn base_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder("Service")
            .operation(OperationDef::new("describe", &[], |_, _| {
                Ok(Value::from("service"))
            }))
            .build()
    }

    #[test]
    fn builder_collects_operations_and_ancestors() {
        let desc = TypeDescriptor::builder("Clock")
            .ancestor("Service")
            .operation(OperationDef::new("start", &[], |_, _| Ok(Value::Null)))
            .operation(OperationDef::new("setInterval", &["i32"], |_, _| {
                Ok(Value::Null)
            }))
            .build();

        assert_eq!(desc.type_name, "Clock");
        assert_eq!(desc.ancestors, vec!["Service"]);
        assert_eq!(desc.operations.len(), 2);
        assert_eq!(desc.operations[1].arity(), 1);
    }

    #[test]
    fn inherit_copies_operations_with_declaring_scope() {
        let parent = base_descriptor();
        let desc = TypeDescriptor::builder("Clock")
            .inherit(&parent)
            .operation(OperationDef::new("start", &[], |_, _| Ok(Value::Null)))
            .build();

        assert_eq!(desc.ancestors, vec!["Service"]);
        let describe = desc
            .operations
            .iter()
            .find(|op| op.name == "describe")
            .unwrap();
        assert_eq!(describe.declaring_type.as_deref(), Some("Service"));
        let start = desc.operations.iter().find(|op| op.name == "start").unwrap();
        assert_eq!(start.declaring_type, None);
    }

    #[test]
    fn handlers_execute_against_the_instance() {
        let op = OperationDef::new("typeName", &[], |svc, _| {
            Ok(Value::from(svc.type_name()))
        });
        let clock = Clock;
        let out = (op.handler)(&clock, &[]).unwrap();
        assert_eq!(out, Value::String("Clock".into()));
    }
}
