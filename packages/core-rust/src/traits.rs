use std::any::Any;
use std::sync::Arc;

use crate::envelope::Message;

/// A live, named service instance that operations can be dispatched to.
///
/// The `Any` bound lets operation handlers downcast to their concrete
/// service type; `type_name` is the instance's concrete type as registered
/// with the dispatch registry.
pub trait ServiceInstance: Any + Send + Sync {
    /// Concrete type name, matching a registered type descriptor.
    fn type_name(&self) -> &str;

    /// Upcast for handler-side downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Resolves a target instance name to a live instance.
///
/// Owned by the service/actor lifecycle layer; the dispatch core consults it
/// only while decoding path-form messages, where argument coercion needs the
/// target's concrete type before any typed value exists.
pub trait ServiceLocator: Send + Sync {
    fn find(&self, name: &str) -> Option<Arc<dyn ServiceInstance>>;
}

/// Sink for completion notifications emitted after a successful invocation.
///
/// Implementations typically put the message on the sender's outbound queue
/// for subscriber fan-out. Must not block the invoking thread.
pub trait Outbox: Send + Sync {
    fn send(&self, msg: Message);
}
