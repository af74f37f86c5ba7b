// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Error types for the value codec and the flattener.

use thiserror::Error;

use crate::value::ValueType;

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A stored leaf could not be turned back into a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The type tag is not one of the six known tags
    #[error("Unknown value type '{0}'")]
    UnknownType(String),

    /// A non-null tag without a payload
    #[error("Missing payload for {0} value")]
    MissingPayload(ValueType),

    /// The payload does not parse as its tag says it should
    #[error("Malformed {value_type} payload '{payload}': {reason}")]
    MalformedPayload {
        value_type: ValueType,
        payload: String,
        reason: String,
    },
}

/// Errors raised while flattening or unflattening a document body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A leaf failed to decode
    #[error("Failed to decode '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: DecodeError,
    },

    /// A key path is used both as a mapping and as a terminal value
    #[error("Structural conflict at '{key}': path is used both as a container and as a leaf")]
    StructuralConflict { key: String },

    /// A mapping key contains the path separator and cannot be addressed
    #[error("Key '{path}' contains the path separator '.'")]
    AmbiguousKey { path: String },
}
