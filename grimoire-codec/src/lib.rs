// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Tagged value codec and body flattening for compendium documents.
//!
//! A document body is an arbitrarily nested JSON mapping. For relational
//! storage it is flattened into one [`Entry`] per leaf, addressed by a dotted
//! key path (`hp.max`) and carrying a [`ValueType`] tag plus a textual payload.
//! [`unflatten`] is the exact inverse.
//!
//! Arrays and empty mappings are leaves: they are stored as a single JSON blob
//! rather than being addressed element by element.
//!
//! # Example
//!
//! ```
//! use grimoire_codec::{flatten, unflatten, ValueType};
//! use serde_json::json;
//!
//! let body = json!({ "hp": { "max": 10, "value": 7 }, "tags": ["undead"] });
//! let body = body.as_object().unwrap();
//!
//! let entries = flatten(body).unwrap();
//! assert_eq!(entries[0].key, "hp.max");
//! assert_eq!(entries[0].value_type, ValueType::Number);
//! assert_eq!(entries[2].value.as_deref(), Some(r#"["undead"]"#));
//!
//! assert_eq!(&unflatten(entries).unwrap(), body);
//! ```

mod error;
mod flatten;
mod value;

pub use error::{DecodeError, Error, Result};
pub use flatten::{Entry, SEPARATOR, flatten, unflatten};
pub use value::{ValueType, decode, encode};
