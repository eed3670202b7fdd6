use serde::{Deserialize, Serialize};

/// Generic runtime value type for operation arguments and results.
///
/// Scalar variants are named after the framework's *boxed* wire type names:
/// values arriving through any lossy or typed-wire channel are always boxed,
/// so the variant name doubles as the value's canonical runtime type name.
/// `Object` carries an explicitly named structured value whose type
/// participates in the dispatch type graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// Absent value. Has no derivable runtime type.
    Null,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Character(char),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// A structured value with an explicit runtime type name.
    Object {
        #[serde(rename = "typeName")]
        type_name: String,
        data: serde_json::Value,
    },
}

impl Value {
    /// The value's canonical (boxed) runtime type name, or `None` for `Null`.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some("Boolean"),
            Value::Byte(_) => Some("Byte"),
            Value::Short(_) => Some("Short"),
            Value::Character(_) => Some("Character"),
            Value::Integer(_) => Some("Integer"),
            Value::Long(_) => Some("Long"),
            Value::Float(_) => Some("Float"),
            Value::Double(_) => Some("Double"),
            Value::String(_) => Some("String"),
            Value::Object { type_name, .. } => Some(type_name),
        }
    }

    /// A short human-readable description of the value's type, for
    /// diagnostics. `Null` renders as `"null"`.
    #[must_use]
    pub fn describe_type(&self) -> &str {
        self.type_name().unwrap_or("null")
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer access with widening: `Byte`, `Short`, and `Integer` all
    /// yield an `i32`.
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Byte(v) => Some(i32::from(*v)),
            Value::Short(v) => Some(i32::from(*v)),
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer access with widening up to `Long`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(i64::from(*v)),
            Value::Short(v) => Some(i64::from(*v)),
            Value::Integer(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Character(c) => Some(*c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Structured payload of an `Object` value.
    #[must_use]
    pub fn as_object(&self) -> Option<(&str, &serde_json::Value)> {
        match self {
            Value::Object { type_name, data } => Some((type_name, data)),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_type_names_are_boxed_wire_names() {
        assert_eq!(Value::Boolean(true).type_name(), Some("Boolean"));
        assert_eq!(Value::Integer(7).type_name(), Some("Integer"));
        assert_eq!(Value::Long(7).type_name(), Some("Long"));
        assert_eq!(Value::Double(0.5).type_name(), Some("Double"));
        assert_eq!(Value::String("x".into()).type_name(), Some("String"));
    }

    #[test]
    fn null_has_no_type() {
        assert_eq!(Value::Null.type_name(), None);
        assert_eq!(Value::Null.describe_type(), "null");
        assert!(Value::Null.is_null());
    }

    #[test]
    fn object_reports_its_declared_type_name() {
        let v = Value::Object {
            type_name: "RgbColor".into(),
            data: serde_json::json!({ "r": 255, "g": 0, "b": 0 }),
        };
        assert_eq!(v.type_name(), Some("RgbColor"));
    }

    #[test]
    fn integer_access_widens_smaller_scalars() {
        assert_eq!(Value::Byte(3).as_i32(), Some(3));
        assert_eq!(Value::Short(300).as_i32(), Some(300));
        assert_eq!(Value::Integer(70_000).as_i64(), Some(70_000));
        assert_eq!(Value::Long(1 << 40).as_i32(), None);
    }

    #[test]
    fn json_roundtrip_keeps_tag_and_value() {
        let v = Value::Integer(42);
        let text = serde_json::to_string(&v).unwrap();
        assert!(text.contains("\"type\":\"Integer\""), "got {text}");
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn msgpack_roundtrip() {
        let v = Value::Object {
            type_name: "Pose".into(),
            data: serde_json::json!({ "x": 1.5, "y": -2.0 }),
        };
        let bytes = rmp_serde::to_vec_named(&v).expect("serialize");
        let back: Value = rmp_serde::from_slice(&bytes).expect("deserialize");
        assert_eq!(back, v);
    }
}
