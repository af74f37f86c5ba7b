// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Dotted-key flattening of document bodies.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::value::{ValueType, decode, encode};

/// Separator between the segments of a key path.
pub const SEPARATOR: char = '.';

/// One flattened leaf of a document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Dotted key path (`a.b.c`)
    pub key: String,
    /// Encoded payload, `None` for null
    pub value: Option<String>,
    /// Type tag of the payload
    pub value_type: ValueType,
}

impl Entry {
    /// Encode `value` as the leaf at `key`.
    pub fn encode(key: impl Into<String>, value: &Value) -> Self {
        let (value, value_type) = encode(value);
        Self {
            key: key.into(),
            value,
            value_type,
        }
    }

    /// Decode the payload back into a value.
    pub fn decode(&self) -> Result<Value> {
        decode(self.value.as_deref(), self.value_type).map_err(|source| Error::Decode {
            key: self.key.clone(),
            source,
        })
    }
}

/// Flatten a body into leaf entries sorted by key.
///
/// Non-empty mappings are descended into; everything else (including empty
/// mappings, arrays and nulls) becomes one entry.
pub fn flatten(body: &Map<String, Value>) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    flatten_into(body, None, &mut entries)?;
    entries.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(entries)
}

fn flatten_into(map: &Map<String, Value>, prefix: Option<&str>, out: &mut Vec<Entry>) -> Result<()> {
    for (key, value) in map {
        let path = match prefix {
            Some(prefix) => format!("{prefix}{SEPARATOR}{key}"),
            None => key.clone(),
        };
        if key.contains(SEPARATOR) {
            return Err(Error::AmbiguousKey { path });
        }
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(inner, Some(&path), out)?,
            leaf => out.push(Entry::encode(path, leaf)),
        }
    }
    Ok(())
}

/// Rebuild a body from its leaf entries.
///
/// Entry order does not matter. Fails with [`Error::StructuralConflict`] when
/// one path is claimed both as a container and as a leaf, or twice as a leaf.
pub fn unflatten<I>(entries: I) -> Result<Map<String, Value>>
where
    I: IntoIterator<Item = Entry>,
{
    let mut root = Map::new();
    let mut leaves = HashSet::new();
    for entry in entries {
        let value = entry.decode()?;
        insert_leaf(&mut root, &leaves, &entry.key, value)?;
        leaves.insert(entry.key);
    }
    Ok(root)
}

fn insert_leaf(
    root: &mut Map<String, Value>,
    leaves: &HashSet<String>,
    key: &str,
    value: Value,
) -> Result<()> {
    let conflict = |path: &str| Error::StructuralConflict {
        key: path.to_owned(),
    };

    let mut current = root;
    let mut start = 0;
    for (dot, _) in key.match_indices(SEPARATOR) {
        let prefix = &key[..dot];
        // An empty mapping stored as a leaf is still an object; only the
        // leaf set tells it apart from an intermediate container.
        if leaves.contains(prefix) {
            return Err(conflict(prefix));
        }
        let slot = current
            .entry(&key[start..dot])
            .or_insert_with(|| Value::Object(Map::new()));
        current = match slot {
            Value::Object(map) => map,
            _ => return Err(conflict(prefix)),
        };
        start = dot + SEPARATOR.len_utf8();
    }

    let last = &key[start..];
    if current.contains_key(last) {
        return Err(conflict(key));
    }
    current.insert(last.to_owned(), value);
    Ok(())
}
