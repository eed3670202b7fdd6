//! Wire codecs bridging external representations to resolvable envelopes.
//!
//! Three representations are supported: JSON structured text, slash-delimited
//! path strings (`/{apiTag}/{target}/{method}/{arg...}`), and base64 MsgPack
//! envelopes for text-only channels. Decode failures never raise past this
//! boundary; they log and return `None`, and callers must check.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use huddle_core::{Message, ServiceLocator, Value};
use tracing::warn;

use crate::index::MethodRegistry;

/// Scheme prefix for base64 binary envelopes.
pub const BASE64_SCHEME: &str = "base64";

// ---------------------------------------------------------------------------
// JSON structured text
// ---------------------------------------------------------------------------

/// JSON envelope codec. Timestamps use the framework's fixed wire format;
/// `pretty` toggles human-readable formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pub pretty: bool,
}

impl JsonCodec {
    #[must_use]
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// # Errors
    ///
    /// Fails only if the envelope cannot be serialized.
    pub fn encode(&self, msg: &Message) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(msg)
        } else {
            serde_json::to_string(msg)
        }
    }

    #[must_use]
    pub fn decode(&self, text: &str) -> Option<Message> {
        match serde_json::from_str(text) {
            Ok(msg) => Some(msg),
            Err(err) => {
                warn!(error = %err, "failed to decode JSON envelope");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Base64 binary envelope
// ---------------------------------------------------------------------------

/// Encode an envelope as `base64://` + base64 of named-map MsgPack, for
/// moving whole envelopes over text-only channels.
///
/// # Errors
///
/// Fails only if the envelope cannot be serialized.
pub fn message_to_base64(msg: &Message) -> Result<String, rmp_serde::encode::Error> {
    let bytes = rmp_serde::to_vec_named(msg)?;
    Ok(format!("{BASE64_SCHEME}://{}", BASE64.encode(bytes)))
}

/// Decode a base64 binary envelope; the scheme prefix is optional.
#[must_use]
pub fn base64_to_message(text: &str) -> Option<Message> {
    let data = text
        .strip_prefix(&format!("{BASE64_SCHEME}://"))
        .unwrap_or(text);
    let bytes = match BASE64.decode(data) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(error = %err, "failed to decode base64 envelope");
            return None;
        }
    };
    match rmp_serde::from_slice(&bytes) {
        Ok(msg) => Some(msg),
        Err(err) => {
            warn!(error = %err, "failed to decode MsgPack envelope");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Path form
// ---------------------------------------------------------------------------

/// Decode `/{apiTag}/{target}/{method}/{arg1}/{arg2}/...`.
///
/// Requires at minimum the tag, target, and method segments; arguments are
/// optional. When `expected_tag` is given, the first segment must match it.
/// Argument segments are raw literals, coerced by asking the registry for
/// the target type's ordinal candidates and applying the declared parameter
/// types of the first viable candidate. The locator supplies the target's
/// concrete type here because no typed value exists yet to derive it from.
#[must_use]
pub fn decode_path(
    path: &str,
    expected_tag: Option<&str>,
    locator: &dyn ServiceLocator,
    registry: &MethodRegistry,
) -> Option<Message> {
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() < 3 {
        warn!(path, "not enough segments, minimum is /{{tag}}/{{target}}/{{method}}");
        return None;
    }
    let (tag, target_name, method) = (parts[0], parts[1], parts[2]);
    if let Some(expected) = expected_tag {
        if tag != expected {
            warn!(path, expected, found = tag, "api tag mismatch");
            return None;
        }
    }

    let mut msg = Message::invoke(target_name, method, Vec::new());
    let literals = &parts[3..];
    if literals.is_empty() {
        return Some(msg);
    }

    let Some(target) = locator.find(target_name) else {
        warn!(target_name, "target not found, cannot coerce path arguments");
        return None;
    };
    let type_name = target.type_name();
    let candidates = registry.ordinal_candidates(type_name, method, literals.len());
    if candidates.is_empty() {
        warn!(
            type_name,
            method,
            arity = literals.len(),
            "no ordinal candidates for path arguments"
        );
        return None;
    }

    for sig in &candidates {
        if let Some(data) = coerce_all(&sig.param_types, literals) {
            msg.data = data;
            return Some(msg);
        }
    }
    warn!(type_name, method, "no candidate's parameter types parse the path literals");
    None
}

fn coerce_all(declared: &[String], literals: &[&str]) -> Option<Vec<Value>> {
    declared
        .iter()
        .zip(literals)
        .map(|(ty, lit)| parse_literal(ty, lit))
        .collect()
}

/// Parse a raw path literal as the declared scalar type. Non-scalar declared
/// types have no literal form and make the candidate non-viable.
fn parse_literal(declared: &str, literal: &str) -> Option<Value> {
    match declared {
        "String" => Some(Value::String(literal.to_string())),
        "Boolean" => literal.parse().ok().map(Value::Boolean),
        "Byte" => literal.parse().ok().map(Value::Byte),
        "Short" => literal.parse().ok().map(Value::Short),
        "Integer" => literal.parse().ok().map(Value::Integer),
        "Long" => literal.parse().ok().map(Value::Long),
        "Float" => literal.parse().ok().map(Value::Float),
        "Double" => literal.parse().ok().map(Value::Double),
        "Character" => {
            let mut chars = literal.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Character(c)),
                _ => None,
            }
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
