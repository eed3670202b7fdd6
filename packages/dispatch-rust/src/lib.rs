//! Operation dispatch for Huddle services.
//!
//! Service types publish their callable operations into a [`MethodRegistry`]
//! of per-type signature indexes. Calls are then located by exact signature
//! where argument types are known ([`MethodRegistry::resolve`]) or executed
//! through the two-tier [`Invoker`], whose bounded [`FallbackCache`]
//! remembers what the exhaustive candidate scan discovers. The [`codec`]
//! module decodes JSON, path, and base64 wire forms into invocable
//! envelopes.

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod index;
pub mod invoke;
pub mod key;
pub mod resolve;

#[cfg(test)]
mod testutil;

pub use cache::{FallbackCache, FallbackKey};
pub use codec::{base64_to_message, decode_path, message_to_base64, JsonCodec};
pub use config::DispatchConfig;
pub use error::{ConfigError, InvocationError, ResolveError};
pub use index::{MethodIndex, MethodRegistry, OperationSignature, RegistryStatistics, TypeGraph};
pub use invoke::Invoker;
pub use key::{box_param, exact_key, ordinal_key};
