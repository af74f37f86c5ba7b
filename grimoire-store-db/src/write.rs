// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Write operations for the compendium store.
//!
//! A document and all of its child rows are written in one transaction;
//! dropping the transaction on any error rolls everything back.

use grimoire_codec::{Entry, flatten};
use rusqlite::{Transaction, params};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::connection::CompendiumDb;
use crate::error::{Error, Result};
use crate::key::{self, Embedded};
use crate::schema::Table;
use crate::types::{Document, StoredCounts};

impl CompendiumDb {
    /// Store a document of `compendium`, superseding any earlier state of the same id.
    pub fn store_document(&mut self, doc: &Document, compendium: &str) -> Result<StoredCounts> {
        if doc.id.is_empty() {
            return Err(Error::MissingDocumentId);
        }
        let document_type = key::document_type_of(&doc.key, &doc.id)?;
        check_collections(doc, document_type)?;
        if !doc.extra.is_empty() {
            let fields: Vec<&str> = doc.extra.keys().map(String::as_str).collect();
            warn!(
                "Fields of {} '{}' are not stored: {}",
                document_type,
                doc.id,
                fields.join(", ")
            );
        }
        let entries = flatten(&doc.system).map_err(|source| Error::Codec {
            document_id: doc.id.clone(),
            source,
        })?;

        let tx = self
            .conn
            .transaction()
            .map_err(|e| Error::from(e).in_transaction(&doc.id))?;
        let counts = write_document(&tx, doc, compendium, document_type, &entries)
            .map_err(|e| e.in_transaction(&doc.id))?;
        tx.commit()
            .map_err(|e| Error::from(e).in_transaction(&doc.id))?;

        debug!(
            "Stored {} '{}' in {compendium}: {} system entries, {} effects, {} children",
            document_type, doc.id, counts.system_entries, counts.effects, counts.children
        );
        Ok(counts)
    }

    /// Replace the value of one stored body leaf.
    ///
    /// Returns `false` if the document has no leaf at `key`. Non-empty
    /// mappings are rejected: they would have to be stored as several leaves.
    pub fn update_system_value(&self, document_id: &str, key: &str, value: &Value) -> Result<bool> {
        if matches!(value, Value::Object(map) if !map.is_empty()) {
            return Err(Error::Codec {
                document_id: document_id.to_owned(),
                source: grimoire_codec::Error::StructuralConflict {
                    key: key.to_owned(),
                },
            });
        }
        let entry = Entry::encode(key, value);
        let rows = self.conn.execute(
            "UPDATE system_data SET value = ?3, value_type = ?4 WHERE document_id = ?1 AND key = ?2",
            params![document_id, entry.key, entry.value, entry.value_type.as_str()],
        )?;
        Ok(rows > 0)
    }
}

/// Reject child collections the document type does not own.
fn check_collections(doc: &Document, document_type: &str) -> Result<()> {
    let owned = Embedded::for_document_type(document_type);
    let carried = [
        (Embedded::Items, doc.items.as_ref().is_some_and(|v| !v.is_empty())),
        (Embedded::Pages, doc.pages.as_ref().is_some_and(|v| !v.is_empty())),
        (Embedded::Results, doc.results.as_ref().is_some_and(|v| !v.is_empty())),
    ];
    for (collection, present) in carried {
        if present && owned != Some(collection) {
            warn!(
                "Rejecting '{}': {document_type} documents cannot carry {}",
                doc.id,
                collection.name()
            );
            return Err(Error::UnexpectedCollection {
                document_id: doc.id.clone(),
                document_type: document_type.to_owned(),
                collection: collection.name(),
            });
        }
    }
    Ok(())
}

fn json_text<T: Serialize>(value: &T, document_id: &str, column: &'static str) -> Result<String> {
    serde_json::to_string(value).map_err(|source| Error::Json {
        document_id: document_id.to_owned(),
        column,
        source,
    })
}

fn missing_id(document_id: &str, collection: &'static str) -> Error {
    warn!("Document '{document_id}' has an entry in {collection} without an id");
    Error::MissingId {
        document_id: document_id.to_owned(),
        collection,
    }
}

fn write_document(
    tx: &Transaction<'_>,
    doc: &Document,
    compendium: &str,
    document_type: &str,
    entries: &[Entry],
) -> Result<StoredCounts> {
    let id = doc.id.as_str();

    tx.execute(
        r#"
        INSERT INTO documents (
            id, name, type, document_type, compendium, img, folder, sort,
            ownership, flags, stats, created_time, modified_time, last_modified_by
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            type = excluded.type,
            document_type = excluded.document_type,
            compendium = excluded.compendium,
            img = excluded.img,
            folder = excluded.folder,
            sort = excluded.sort,
            ownership = excluded.ownership,
            flags = excluded.flags,
            stats = excluded.stats,
            created_time = excluded.created_time,
            modified_time = excluded.modified_time,
            last_modified_by = excluded.last_modified_by
        "#,
        params![
            id,
            doc.name,
            doc.kind,
            document_type,
            compendium,
            doc.img,
            doc.folder,
            doc.sort,
            json_text(&doc.ownership, id, "ownership")?,
            json_text(&doc.flags, id, "flags")?,
            json_text(&doc.stats, id, "stats")?,
            doc.created_time(),
            doc.modified_time(),
            doc.last_modified_by(),
        ],
    )?;

    // Children of every kind go, so a document that changed type leaves nothing behind.
    for table in Table::CHILDREN {
        tx.execute(
            &format!(
                "DELETE FROM {} WHERE {} = ?1",
                table.name(),
                table.document_column()
            ),
            params![id],
        )?;
    }

    let mut counts = StoredCounts {
        system_entries: entries.len(),
        effects: doc.effects.len(),
        children: 0,
    };

    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO system_data (document_id, key, value, value_type) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for entry in entries {
            stmt.execute(params![id, entry.key, entry.value, entry.value_type.as_str()])?;
        }
    }

    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO effects (document_id, id, name, data) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for effect in &doc.effects {
            let effect_id = effect
                .get("_id")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| missing_id(id, "effects"))?;
            let name = effect.get("name").and_then(Value::as_str);
            stmt.execute(params![id, effect_id, name, effect.to_string()])?;
        }
    }

    match Embedded::for_document_type(document_type) {
        Some(Embedded::Items) => {
            let mut stmt = tx.prepare_cached(
                r#"
                INSERT INTO embedded_items (
                    actor_id, id, name, type, img, sort, system_data, effects, flags
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )?;
            for item in doc.items.iter().flatten() {
                if item.id.is_empty() {
                    return Err(missing_id(id, "items"));
                }
                stmt.execute(params![
                    id,
                    item.id,
                    item.name,
                    item.kind,
                    item.img,
                    item.sort,
                    json_text(&item.system, id, "embedded_items.system_data")?,
                    json_text(&item.effects, id, "embedded_items.effects")?,
                    json_text(&item.flags, id, "embedded_items.flags")?,
                ])?;
                counts.children += 1;
            }
        }
        Some(Embedded::Pages) => {
            let mut stmt = tx.prepare_cached(
                r#"
                INSERT INTO journal_pages (
                    journal_id, id, name, type, title, text_content, text_format, sort
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )?;
            for page in doc.pages.iter().flatten() {
                if page.id.is_empty() {
                    return Err(missing_id(id, "pages"));
                }
                let text = page.text.as_ref();
                stmt.execute(params![
                    id,
                    page.id,
                    page.name,
                    page.kind,
                    page.stored_title(),
                    text.map(|t| t.content.as_str()),
                    text.map(|t| t.format),
                    page.sort,
                ])?;
                counts.children += 1;
            }
        }
        Some(Embedded::Results) => {
            let mut stmt = tx.prepare_cached(
                r#"
                INSERT INTO table_results (
                    table_id, id, type, text, img, weight, range_start, range_end, drawn, flags
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )?;
            for result in doc.results.iter().flatten() {
                if result.id.is_empty() {
                    return Err(missing_id(id, "results"));
                }
                stmt.execute(params![
                    id,
                    result.id,
                    result.kind,
                    result.text,
                    result.img,
                    result.weight,
                    result.range[0],
                    result.range[1],
                    result.drawn,
                    json_text(&result.flags, id, "table_results.flags")?,
                ])?;
                counts.children += 1;
            }
        }
        None => {}
    }

    Ok(counts)
}
