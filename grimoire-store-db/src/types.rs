// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Document shapes exchanged with the pack extractor/compiler, and row types.
//!
//! Field order of the serialized structs is the order the compiler receives.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form JSON mapping.
pub type Object = Map<String, Value>;

fn default_weight() -> i64 {
    1
}

fn default_text_format() -> i64 {
    1
}

fn default_show() -> bool {
    true
}

/// A top-level compendium document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Domain subtype (`weapon`, `character`, ...)
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub sort: i64,
    #[serde(default)]
    pub ownership: Object,
    #[serde(default)]
    pub flags: Object,
    #[serde(rename = "_stats", default)]
    pub stats: Object,
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub system: Object,
    #[serde(default)]
    pub effects: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<EmbeddedItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<JournalPage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<TableResult>>,
    /// Top-level fields with no column in the store
    #[serde(flatten)]
    pub extra: Object,
}

impl Document {
    /// `_stats.createdTime`
    pub fn created_time(&self) -> Option<i64> {
        self.stats.get("createdTime").and_then(Value::as_i64)
    }

    /// `_stats.modifiedTime`
    pub fn modified_time(&self) -> Option<i64> {
        self.stats.get("modifiedTime").and_then(Value::as_i64)
    }

    /// `_stats.lastModifiedBy`
    pub fn last_modified_by(&self) -> Option<&str> {
        self.stats.get("lastModifiedBy").and_then(Value::as_str)
    }
}

/// An item embedded in an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedItem {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub sort: i64,
    #[serde(default)]
    pub system: Object,
    #[serde(default)]
    pub effects: Vec<Value>,
    #[serde(default)]
    pub flags: Object,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub ownership: Object,
    #[serde(rename = "_key", default)]
    pub key: String,
}

/// A page of a journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalPage {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<PageTitle>,
    #[serde(default)]
    pub text: Option<PageText>,
    #[serde(default)]
    pub sort: i64,
    #[serde(default)]
    pub ownership: Object,
    #[serde(default)]
    pub flags: Object,
    #[serde(rename = "_key", default)]
    pub key: String,
}

impl JournalPage {
    /// Title as stored: `None` when hidden or absent.
    pub fn stored_title(&self) -> Option<&str> {
        self.title
            .as_ref()
            .filter(|title| title.show)
            .map(|title| title.content.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTitle {
    #[serde(default = "default_show")]
    pub show: bool,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_text_format")]
    pub format: i64,
}

/// A result row of a roll table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableResult {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<ResultType>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: i64,
    /// Inclusive `[start, end]` range
    #[serde(default)]
    pub range: [Option<i64>; 2],
    #[serde(default)]
    pub drawn: bool,
    #[serde(default)]
    pub flags: Object,
    #[serde(rename = "_key", default)]
    pub key: String,
}

/// Table result type: a numeric code in older packs, a name in newer ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultType {
    Code(i64),
    Name(String),
}

impl ToSql for ResultType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            ResultType::Code(code) => code.to_sql(),
            ResultType::Name(name) => name.to_sql(),
        }
    }
}

impl FromSql for ResultType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(code) => Ok(ResultType::Code(code)),
            ValueRef::Text(_) => value.as_str().map(|name| ResultType::Name(name.to_owned())),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// Row counts written for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoredCounts {
    pub system_entries: usize,
    pub effects: usize,
    /// Items, pages or results, depending on the document type
    pub children: usize,
}

/// Identifying columns of a document row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub id: String,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub document_type: String,
    pub compendium: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_document_defaults() {
        let doc: Document =
            serde_json::from_value(json!({ "_id": "abc", "_key": "!items!abc" })).unwrap();
        assert_eq!(doc.id, "abc");
        assert_eq!(doc.sort, 0);
        assert!(doc.system.is_empty());
        assert!(doc.effects.is_empty());
        assert!(doc.items.is_none());
    }

    #[test]
    fn test_stats_accessors() {
        let doc: Document = serde_json::from_value(json!({
            "_id": "abc",
            "_stats": { "createdTime": 1700000000000i64, "modifiedTime": 1700000001000i64, "lastModifiedBy": "gm" }
        }))
        .unwrap();
        assert_eq!(doc.created_time(), Some(1_700_000_000_000));
        assert_eq!(doc.modified_time(), Some(1_700_000_001_000));
        assert_eq!(doc.last_modified_by(), Some("gm"));
    }

    #[test]
    fn test_result_type_untagged() {
        let code: TableResult = serde_json::from_value(json!({ "_id": "r", "type": 0 })).unwrap();
        assert_eq!(code.kind, Some(ResultType::Code(0)));
        assert_eq!(code.weight, 1);

        let name: TableResult =
            serde_json::from_value(json!({ "_id": "r", "type": "text", "range": [1, 2] })).unwrap();
        assert_eq!(name.kind, Some(ResultType::Name("text".into())));
        assert_eq!(name.range, [Some(1), Some(2)]);
    }

    #[test]
    fn test_stored_title() {
        let mut page: JournalPage = serde_json::from_value(json!({
            "_id": "p",
            "title": { "show": true, "content": "Chapter 1" }
        }))
        .unwrap();
        assert_eq!(page.stored_title(), Some("Chapter 1"));

        page.title = Some(PageTitle {
            show: false,
            content: "Chapter 1".into(),
        });
        assert_eq!(page.stored_title(), None);

        page.title = None;
        assert_eq!(page.stored_title(), None);
    }

    #[test]
    fn test_serialized_field_order() {
        let doc: Document = serde_json::from_value(json!({
            "_key": "!items!abc", "system": {}, "_id": "abc", "name": "Sword"
        }))
        .unwrap();
        let text = serde_json::to_string(&doc).unwrap();
        assert!(text.starts_with(r#"{"_id":"abc","name":"Sword","type":null"#));
        assert!(text.ends_with(r#""_key":"!items!abc","system":{},"effects":[]}"#));
    }

    #[test]
    fn test_unknown_fields_are_collected() {
        let doc: Document = serde_json::from_value(json!({
            "_id": "a1",
            "_key": "!actors!a1",
            "prototypeToken": { "name": "Goblin", "width": 1 },
            "folder": null
        }))
        .unwrap();
        assert_eq!(doc.extra.len(), 1);
        assert_eq!(doc.extra["prototypeToken"]["width"], json!(1));
        assert!(doc.folder.is_none());

        let text = serde_json::to_string(&doc).unwrap();
        assert!(text.ends_with(r#""effects":[],"prototypeToken":{"name":"Goblin","width":1}}"#));
    }
}
