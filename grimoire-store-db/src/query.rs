// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Read query operations and document reconstruction.

use grimoire_codec::{Entry, ValueType, unflatten};
use rusqlite::{OptionalExtension, Row, params};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::connection::CompendiumDb;
use crate::error::{Error, Result};
use crate::key::{self, Embedded};
use crate::schema::Table;
use crate::types::{
    Document, DocumentSummary, EmbeddedItem, JournalPage, Object, PageText, PageTitle, TableResult,
};

fn parse_json<T: DeserializeOwned>(text: &str, document_id: &str, column: &'static str) -> Result<T> {
    serde_json::from_str(text).map_err(|source| Error::Json {
        document_id: document_id.to_owned(),
        column,
        source,
    })
}

fn default_ownership() -> Object {
    let mut ownership = Object::new();
    ownership.insert("default".to_owned(), Value::from(0));
    ownership
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<DocumentSummary> {
    Ok(DocumentSummary {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        document_type: row.get(3)?,
        compendium: row.get(4)?,
    })
}

impl CompendiumDb {
    /// Rebuild a stored document with all of its children.
    ///
    /// Returns `None` if no document has this id.
    pub fn reconstruct(&self, document_id: &str) -> Result<Option<Document>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, name, type, img, folder, sort, ownership, flags, stats, document_type
            FROM documents
            WHERE id = ?1
            "#,
        )?;
        let row = stmt
            .query_row(params![document_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                    row.get::<_, String>(8)?,
                    row.get::<_, String>(9)?,
                ))
            })
            .optional()?;

        let Some((id, name, kind, img, folder, sort, ownership, flags, stats, document_type)) = row
        else {
            return Ok(None);
        };

        let mut doc = Document {
            key: key::document_key(&document_type, &id),
            ownership: parse_json(&ownership, &id, "ownership")?,
            flags: parse_json(&flags, &id, "flags")?,
            stats: parse_json(&stats, &id, "stats")?,
            system: self.system_data(&id)?,
            effects: self.effects(&id)?,
            id,
            name,
            kind,
            img,
            folder,
            sort,
            items: None,
            pages: None,
            results: None,
            extra: Object::new(),
        };

        match Embedded::for_document_type(&document_type) {
            Some(Embedded::Items) => doc.items = Some(self.embedded_items(&doc.id)?),
            Some(Embedded::Pages) => doc.pages = Some(self.journal_pages(&doc.id)?),
            Some(Embedded::Results) => doc.results = Some(self.table_results(&doc.id)?),
            None => {}
        }

        Ok(Some(doc))
    }

    /// Stored body leaves of a document, ordered by key.
    pub fn system_entries(&self, document_id: &str) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT key, value, value_type FROM system_data WHERE document_id = ?1 ORDER BY key",
        )?;
        let rows = stmt
            .query_map(params![document_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(key, value, value_type)| {
                let value_type = value_type.parse::<ValueType>().map_err(|source| Error::Decode {
                    document_id: document_id.to_owned(),
                    key: key.clone(),
                    source,
                })?;
                Ok(Entry {
                    key,
                    value,
                    value_type,
                })
            })
            .collect()
    }

    /// Body of a document, unflattened from its leaves.
    pub fn system_data(&self, document_id: &str) -> Result<Object> {
        unflatten(self.system_entries(document_id)?).map_err(|source| Error::Codec {
            document_id: document_id.to_owned(),
            source,
        })
    }

    /// Effects of a document, in the order they were stored.
    pub fn effects(&self, document_id: &str) -> Result<Vec<Value>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT data FROM effects WHERE document_id = ?1 ORDER BY rowid")?;
        let rows = stmt
            .query_map(params![document_id], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.iter()
            .map(|data| parse_json(data, document_id, "effects.data"))
            .collect()
    }

    /// Items embedded in an actor, ordered by sort then name.
    pub fn embedded_items(&self, actor_id: &str) -> Result<Vec<EmbeddedItem>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, name, type, img, sort, system_data, effects, flags
            FROM embedded_items
            WHERE actor_id = ?1
            ORDER BY sort, name
            "#,
        )?;
        let rows = stmt
            .query_map(params![actor_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, name, kind, img, sort, system, effects, flags)| {
                Ok(EmbeddedItem {
                    key: key::embedded_key("actors", Embedded::Items, actor_id, &id),
                    system: parse_json(&system, actor_id, "embedded_items.system_data")?,
                    effects: parse_json(&effects, actor_id, "embedded_items.effects")?,
                    flags: parse_json(&flags, actor_id, "embedded_items.flags")?,
                    folder: None,
                    ownership: default_ownership(),
                    id,
                    name,
                    kind,
                    img,
                    sort,
                })
            })
            .collect()
    }

    /// Pages of a journal entry, ordered by sort then name.
    pub fn journal_pages(&self, journal_id: &str) -> Result<Vec<JournalPage>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, name, type, title, text_content, text_format, sort
            FROM journal_pages
            WHERE journal_id = ?1
            ORDER BY sort, name
            "#,
        )?;
        let pages = stmt
            .query_map(params![journal_id], |row| {
                let id: String = row.get(0)?;
                let title: Option<String> = row.get(3)?;
                Ok(JournalPage {
                    key: key::embedded_key("journal", Embedded::Pages, journal_id, &id),
                    id,
                    name: row.get(1)?,
                    kind: row.get(2)?,
                    title: Some(PageTitle {
                        show: title.is_some(),
                        content: title.unwrap_or_default(),
                    }),
                    text: Some(PageText {
                        content: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                        format: row.get::<_, Option<i64>>(5)?.unwrap_or(1),
                    }),
                    sort: row.get(6)?,
                    ownership: default_ownership(),
                    flags: Object::new(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(pages)
    }

    /// Results of a roll table, ordered by range start then id.
    pub fn table_results(&self, table_id: &str) -> Result<Vec<TableResult>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, type, text, img, weight, range_start, range_end, drawn, flags
            FROM table_results
            WHERE table_id = ?1
            ORDER BY range_start, id
            "#,
        )?;
        let rows = stmt
            .query_map(params![table_id], |row| {
                let id: String = row.get(0)?;
                Ok((
                    TableResult {
                        key: key::embedded_key("tables", Embedded::Results, table_id, &id),
                        id,
                        kind: row.get(1)?,
                        text: row.get(2)?,
                        img: row.get(3)?,
                        weight: row.get(4)?,
                        range: [row.get(5)?, row.get(6)?],
                        drawn: row.get(7)?,
                        flags: Object::new(),
                    },
                    row.get::<_, String>(8)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(mut result, flags)| {
                result.flags = parse_json(&flags, table_id, "table_results.flags")?;
                Ok(result)
            })
            .collect()
    }

    /// Distinct compendium names, excluding orphaned documents, alphabetically.
    pub fn compendiums(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT DISTINCT compendium
            FROM documents
            WHERE compendium IS NOT NULL
            ORDER BY compendium
            "#,
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Ids of the documents of a compendium, in export order.
    pub fn compendium_document_ids(&self, compendium: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id FROM documents
            WHERE compendium = ?1
            ORDER BY document_type, name, id
            "#,
        )?;
        let ids = stmt
            .query_map(params![compendium], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(ids)
    }

    /// Documents of a domain subtype (`weapon`, `npc`, ...).
    pub fn documents_by_type(&self, kind: &str) -> Result<Vec<DocumentSummary>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, name, type, document_type, compendium
            FROM documents
            WHERE type = ?1
            ORDER BY compendium, name, id
            "#,
        )?;
        let docs = stmt
            .query_map(params![kind], summary_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(docs)
    }

    /// Documents of a structural kind (`actors`, `journal`, ...).
    pub fn documents_by_document_type(&self, document_type: &str) -> Result<Vec<DocumentSummary>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, name, type, document_type, compendium
            FROM documents
            WHERE document_type = ?1
            ORDER BY compendium, name, id
            "#,
        )?;
        let docs = stmt
            .query_map(params![document_type], summary_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(docs)
    }

    /// Documents having a body leaf at `key`, with that leaf.
    pub fn documents_with_key(&self, key: &str) -> Result<Vec<(String, Entry)>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT document_id, value, value_type
            FROM system_data
            WHERE key = ?1
            ORDER BY document_id
            "#,
        )?;
        let rows = stmt
            .query_map(params![key], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(document_id, value, value_type)| {
                let value_type = value_type.parse::<ValueType>().map_err(|source| Error::Decode {
                    document_id: document_id.clone(),
                    key: key.to_owned(),
                    source,
                })?;
                let entry = Entry {
                    key: key.to_owned(),
                    value,
                    value_type,
                };
                Ok((document_id, entry))
            })
            .collect()
    }

    /// Count all rows of a table.
    pub fn count_rows(&self, table: Table) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table.name()), [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }

    /// Count the rows of a table belonging to one document.
    pub fn count_rows_for(&self, table: Table, document_id: &str) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE {} = ?1",
                table.name(),
                table.document_column()
            ),
            params![document_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
