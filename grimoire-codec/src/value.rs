// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Single value encoding.
//!
//! | tag       | payload                          |
//! |-----------|----------------------------------|
//! | `null`    | none                             |
//! | `boolean` | `true` / `false`                 |
//! | `number`  | canonical JSON number            |
//! | `string`  | JSON-quoted string               |
//! | `object`  | complete JSON object (opaque)    |
//! | `array`   | complete JSON array (opaque)     |

use std::fmt;
use std::str::FromStr;

use serde_json::{Number, Value};

use crate::error::DecodeError;

/// Type tag stored next to every encoded leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    Null,
    Boolean,
    Number,
    String,
    Object,
    Array,
}

impl ValueType {
    /// Tag for a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(Self::Null),
            "boolean" => Ok(Self::Boolean),
            "number" => Ok(Self::Number),
            "string" => Ok(Self::String),
            "object" => Ok(Self::Object),
            "array" => Ok(Self::Array),
            other => Err(DecodeError::UnknownType(other.to_owned())),
        }
    }
}

/// Encode a value into its textual payload and tag.
pub fn encode(value: &Value) -> (Option<String>, ValueType) {
    let payload = match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(_) | Value::Object(_) | Value::Array(_) => Some(value.to_string()),
    };
    (payload, ValueType::of(value))
}

/// Decode a payload according to its tag.
///
/// A `null` tag ignores any payload.
pub fn decode(payload: Option<&str>, value_type: ValueType) -> Result<Value, DecodeError> {
    if value_type == ValueType::Null {
        return Ok(Value::Null);
    }
    let payload = payload.ok_or(DecodeError::MissingPayload(value_type))?;
    let malformed = |reason: String| DecodeError::MalformedPayload {
        value_type,
        payload: payload.to_owned(),
        reason,
    };

    match value_type {
        ValueType::Null => Ok(Value::Null),
        ValueType::Boolean => match payload {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(malformed("expected 'true' or 'false'".into())),
        },
        ValueType::Number => serde_json::from_str::<Number>(payload)
            .map(Value::Number)
            .map_err(|e| malformed(e.to_string())),
        ValueType::String => serde_json::from_str::<String>(payload)
            .map(Value::String)
            .map_err(|e| malformed(e.to_string())),
        ValueType::Object => match serde_json::from_str::<Value>(payload) {
            Ok(value @ Value::Object(_)) => Ok(value),
            Ok(other) => Err(malformed(format!("found {}", ValueType::of(&other)))),
            Err(e) => Err(malformed(e.to_string())),
        },
        ValueType::Array => match serde_json::from_str::<Value>(payload) {
            Ok(value @ Value::Array(_)) => Ok(value),
            Ok(other) => Err(malformed(format!("found {}", ValueType::of(&other)))),
            Err(e) => Err(malformed(e.to_string())),
        },
    }
}
