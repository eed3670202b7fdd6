//! Canonical signature keys.
//!
//! Keys are plain strings so every encoding that can carry text can carry a
//! signature. All parameter types are *boxed* before keying: values arriving
//! through a typed-wire channel are always boxed, so keys must match on that
//! basis and `doIt(i32)` stays directly invocable with a wire `Integer`.

use tracing::error;

use crate::error::ConfigError;

/// Box a declared parameter type name to its canonical wire equivalent.
///
/// Primitive scalar names map 1:1 to their boxed wire names; anything else
/// passes through unchanged. A lowercase name outside the scalar set is
/// treated as an unrecognized primitive; this should not happen for any
/// language's scalar set, so it fails loudly.
///
/// # Errors
///
/// `ConfigError::MalformedTypeName` for empty names or names containing key
/// syntax characters; `ConfigError::UnknownScalar` for an unrecognized
/// primitive-looking name.
pub fn box_param(name: &str) -> Result<&str, ConfigError> {
    if name.is_empty() || name.contains(['(', ')', ',']) || name.contains(char::is_whitespace) {
        return Err(ConfigError::MalformedTypeName {
            name: name.to_string(),
        });
    }
    match name {
        "bool" => Ok("Boolean"),
        "char" => Ok("Character"),
        "i8" => Ok("Byte"),
        "i16" => Ok("Short"),
        "i32" => Ok("Integer"),
        "i64" => Ok("Long"),
        "f32" => Ok("Float"),
        "f64" => Ok("Double"),
        "()" | "void" => Ok("Void"),
        other => {
            if other.starts_with(|c: char| c.is_ascii_lowercase()) {
                error!(name = other, "unexpected primitive type, no boxed equivalent");
                Err(ConfigError::UnknownScalar {
                    name: other.to_string(),
                })
            } else {
                Ok(other)
            }
        }
    }
}

/// Exact key: `{type}.{name}({p1,p2,...})` with boxed parameter type names.
#[must_use]
pub fn exact_key<P: AsRef<str>>(type_name: &str, method: &str, boxed_params: &[P]) -> String {
    let params: Vec<&str> = boxed_params.iter().map(AsRef::as_ref).collect();
    format!("{type_name}.{method}({})", params.join(","))
}

/// Ordinal key: `{type}.{name}-{arity}`, ignoring parameter types.
#[must_use]
pub fn ordinal_key(type_name: &str, method: &str, arity: usize) -> String {
    format!("{type_name}.{method}-{arity}")
}
