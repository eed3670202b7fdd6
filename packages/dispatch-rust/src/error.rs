//! Error taxonomy for the dispatch core.
//!
//! Decode failures are deliberately absent: the codecs never raise past
//! their boundary; they log and return `None`, and callers must check.

use thiserror::Error;

/// Malformed type or parameter metadata discovered at registration time.
///
/// Scoped to the type being registered; other types are unaffected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unrecognized primitive type `{name}` has no boxed equivalent")]
    UnknownScalar { name: String },
    #[error("ill-formed type name `{name}`")]
    MalformedTypeName { name: String },
    #[error("type `{type_name}` operation `{operation}`: {source}")]
    BadOperation {
        type_name: String,
        operation: String,
        #[source]
        source: Box<ConfigError>,
    },
}

/// The resolver exhausted the exact, ordinal, and assignability search.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no index registered for type `{type_name}`")]
    UnknownType { type_name: String },
    #[error("no operation matches `{key}`")]
    NoSuchOperation { key: String },
    #[error("no assignable candidate for `{key}`; attempted: {}", attempted.join(", "))]
    NoAssignableCandidate { key: String, attempted: Vec<String> },
}

/// An operation was located but could not be executed, or the exhaustive
/// scan found no invokable candidate.
#[derive(Debug, Error)]
#[error("invoking {method}({arg_types}) with {arity} argument(s) failed")]
pub struct InvocationError {
    pub method: String,
    pub arity: usize,
    /// Short description of each argument's runtime type.
    pub arg_types: String,
    /// Last underlying candidate failure, kept for diagnostics.
    #[source]
    pub source: Option<anyhow::Error>,
}
