//! Huddle Core: message envelope, runtime values, service traits, and
//! per-type operation tables shared by every layer of the framework.

pub mod descriptor;
pub mod envelope;
pub mod traits;
pub mod types;

pub use descriptor::{OperationDef, OperationHandler, TypeDescriptor, TypeDescriptorBuilder};
pub use envelope::{Message, TIMESTAMP_FORMAT};
pub use traits::{Outbox, ServiceInstance, ServiceLocator};
pub use types::Value;
