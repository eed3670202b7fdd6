//! The message envelope exchanged between service instances.
//!
//! An envelope names a target instance and an operation, and carries the
//! ordered argument values, either fully typed (in-process) or still
//! pending coercion from wire literals. Field names use camelCase on the
//! wire for cross-language compatibility.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Value;

/// Fixed wire format for envelope timestamps: `yyyy-MM-dd HH:mm:ss.SSS`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Serde adapter pinning [`Message::timestamp`] to [`TIMESTAMP_FORMAT`].
pub mod timestamp_format {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    /// # Errors
    ///
    /// Fails if the formatted timestamp cannot be written by the serializer.
    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
    }

    /// # Errors
    ///
    /// Fails if the input string does not match [`TIMESTAMP_FORMAT`].
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let naive = NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT)
            .map_err(serde::de::Error::custom)?;
        Ok(naive.and_utc())
    }
}

/// An operation call (or completion notification) addressed to a named
/// service instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Correlation id, unique enough within a sender's stream.
    pub msg_id: u64,
    /// Creation time, fixed wire format (see [`TIMESTAMP_FORMAT`]).
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
    /// Target service instance name.
    pub name: String,
    /// Originating instance name, when known.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sender: Option<String>,
    /// Operation on the sender that produced this message, when known.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sending_method: Option<String>,
    /// Operation to invoke on the target.
    pub method: String,
    /// Ordered argument values.
    pub data: Vec<Value>,
}

impl Message {
    /// Build an invocation envelope addressed to `name.method(data...)`.
    #[must_use]
    pub fn invoke(name: impl Into<String>, method: impl Into<String>, data: Vec<Value>) -> Self {
        let timestamp = Utc::now();
        Self {
            #[allow(clippy::cast_sign_loss)]
            msg_id: timestamp.timestamp_millis() as u64,
            timestamp,
            name: name.into(),
            sender: None,
            sending_method: None,
            method: method.into(),
            data,
        }
    }

    /// Build an unaddressed completion notification for `method`'s result.
    /// The routing layer fills in the target from the sender's subscribers.
    #[must_use]
    pub fn callback(method: impl Into<String>, result: Value) -> Self {
        let method = method.into();
        let mut msg = Message::invoke(String::new(), method.clone(), vec![result]);
        msg.sending_method = Some(method);
        msg
    }
}
