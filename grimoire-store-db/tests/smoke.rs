// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Smoke tests for grimoire-store-db.
//!
//! These tests verify the schema, document writes and reconstruction using
//! an in-memory database.

use grimoire_store_db::{
    CompendiumDb, Document, Error, OpenMode, PageTitle, ResultType, Table,
};
use rusqlite::types::Value as SqlValue;
use serde_json::{Value, json};

fn document(value: Value) -> Document {
    serde_json::from_value(value).unwrap()
}

fn actor() -> Document {
    document(json!({
        "_id": "a1",
        "name": "Goblin",
        "type": "npc",
        "img": "icons/goblin.webp",
        "sort": 100,
        "ownership": { "default": 0 },
        "flags": { "core": { "sheetClass": "" } },
        "_stats": { "createdTime": 1700000000000i64, "modifiedTime": 1700000005000i64, "lastModifiedBy": "gm" },
        "_key": "!actors!a1",
        "system": {
            "hp": { "value": 7, "max": 10 },
            "skills": ["stealth", "climb"],
            "notes": null,
            "traits": {}
        },
        "effects": [],
        "items": [
            { "_id": "shield", "name": "Shield", "type": "armor", "sort": 2, "system": { "ac": 1 } },
            { "_id": "sword", "name": "Sword", "type": "weapon", "sort": 1, "system": { "damage": "d8" } }
        ]
    }))
}

/// Every row of every table, in a stable order.
fn dump(db: &CompendiumDb) -> Vec<Vec<SqlValue>> {
    let mut rows = Vec::new();
    for table in Table::ALL {
        let mut stmt = db
            .connection()
            .prepare(&format!("SELECT * FROM {} ORDER BY 1, 2", table.name()))
            .unwrap();
        let columns = stmt.column_count();
        let table_rows = stmt
            .query_map([], |row| {
                (0..columns)
                    .map(|i| row.get::<_, SqlValue>(i))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .unwrap()
            .collect::<rusqlite::Result<Vec<_>>>()
            .unwrap();
        rows.extend(table_rows);
    }
    rows
}

fn rows_for(db: &CompendiumDb, id: &str) -> u64 {
    Table::ALL
        .iter()
        .map(|table| db.count_rows_for(*table, id).unwrap())
        .sum()
}

#[test]
fn test_schema_creation() {
    let db = CompendiumDb::open_memory().unwrap();
    assert!(db.has_schema().unwrap());
    assert!(db.has_indexes().unwrap());
    assert_eq!(db.count_rows(Table::Documents).unwrap(), 0);
    assert!(db.compendiums().unwrap().is_empty());
    assert_eq!(db.reconstruct("missing").unwrap(), None);
}

#[test]
fn test_actor_items_ordered_by_sort() {
    let mut db = CompendiumDb::open_memory().unwrap();
    let counts = db.store_document(&actor(), "monsters").unwrap();
    assert_eq!(counts.children, 2);
    assert_eq!(counts.effects, 0);

    let doc = db.reconstruct("a1").unwrap().unwrap();
    let items = doc.items.as_ref().unwrap();
    let ids: Vec<_> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, ["sword", "shield"]);
    assert_eq!(doc.system["hp"]["max"], json!(10));
    assert_eq!(items[0].key, "!actors.items!a1.sword");
    assert_eq!(items[0].ownership.get("default"), Some(&json!(0)));
    assert_eq!(items[0].folder, None);
    assert_eq!(items[0].system, actor().items.unwrap()[1].system);
}

#[test]
fn test_reconstruction_fidelity() {
    let mut db = CompendiumDb::open_memory().unwrap();
    let original = actor();
    db.store_document(&original, "monsters").unwrap();

    let doc = db.reconstruct("a1").unwrap().unwrap();
    assert_eq!(doc.system, original.system);
    assert_eq!(doc.system["notes"], Value::Null);
    assert_eq!(doc.system["traits"], json!({}));
    assert_eq!(doc.stats, original.stats);
    assert_eq!(doc.key, "!actors!a1");
    assert!(doc.pages.is_none());
    assert!(doc.results.is_none());

    let item = document(json!({
        "_id": "i1",
        "name": "Potion",
        "type": "consumable",
        "img": null,
        "folder": "f1",
        "sort": 5,
        "ownership": { "default": 2 },
        "flags": {},
        "_stats": {},
        "_key": "!items!i1",
        "system": { "uses": { "max": 1, "spent": false }, "formula": "2d4+2" },
        "effects": [
            { "_id": "e2", "name": "Regen", "changes": [{ "key": "hp", "value": 1 }] },
            { "_id": "e1", "name": "Haste", "disabled": true }
        ]
    }));
    db.store_document(&item, "potions").unwrap();
    assert_eq!(db.reconstruct("i1").unwrap().unwrap(), item);
}

#[test]
fn test_store_is_idempotent() {
    let mut db = CompendiumDb::open_memory().unwrap();
    db.store_document(&actor(), "monsters").unwrap();
    let first = dump(&db);
    db.store_document(&actor(), "monsters").unwrap();
    assert_eq!(dump(&db), first);
}

#[test]
fn test_rewrite_supersedes_previous_state() {
    let mut db = CompendiumDb::open_memory().unwrap();
    db.store_document(&actor(), "monsters").unwrap();

    let mut changed = actor();
    changed.system = json!({ "hp": { "max": 3 } }).as_object().unwrap().clone();
    changed.items = Some(Vec::new());
    db.store_document(&changed, "monsters").unwrap();

    assert_eq!(db.count_rows_for(Table::SystemData, "a1").unwrap(), 1);
    assert_eq!(db.count_rows_for(Table::EmbeddedItems, "a1").unwrap(), 0);
    let doc = db.reconstruct("a1").unwrap().unwrap();
    assert_eq!(doc.system, changed.system);
    assert_eq!(doc.items, Some(Vec::new()));
}

#[test]
fn test_failed_write_leaves_no_rows() {
    let mut db = CompendiumDb::open_memory().unwrap();
    let mut doc = actor();
    if let Some(items) = doc.items.as_mut() {
        items[1].id.clear();
    }

    let err = db.store_document(&doc, "monsters").unwrap_err();
    assert!(matches!(
        err,
        Error::MissingId {
            collection: "items",
            ..
        }
    ));
    assert_eq!(rows_for(&db, "a1"), 0);
    assert_eq!(db.count_rows(Table::Documents).unwrap(), 0);
}

#[test]
fn test_failed_rewrite_keeps_previous_state() {
    let mut db = CompendiumDb::open_memory().unwrap();
    db.store_document(&actor(), "monsters").unwrap();
    let before = db.reconstruct("a1").unwrap().unwrap();

    let mut broken = actor();
    broken.system = json!({ "hp": { "max": 99 } }).as_object().unwrap().clone();
    broken.effects = vec![json!({ "name": "No id" })];
    let err = db.store_document(&broken, "monsters").unwrap_err();
    assert!(matches!(
        err,
        Error::MissingId {
            collection: "effects",
            ..
        }
    ));

    assert_eq!(db.reconstruct("a1").unwrap().unwrap(), before);
}

#[test]
fn test_rejects_malformed_documents() {
    let mut db = CompendiumDb::open_memory().unwrap();

    let no_id = document(json!({ "_key": "!items!" }));
    assert!(matches!(
        db.store_document(&no_id, "x"),
        Err(Error::MissingDocumentId)
    ));

    let bad_key = document(json!({ "_id": "i1", "_key": "!items!other" }));
    assert!(matches!(
        db.store_document(&bad_key, "x"),
        Err(Error::InvalidKey { .. })
    ));

    let foreign = document(json!({
        "_id": "i2",
        "_key": "!items!i2",
        "pages": [{ "_id": "p1", "name": "Page" }]
    }));
    assert!(matches!(
        db.store_document(&foreign, "x"),
        Err(Error::UnexpectedCollection {
            collection: "pages",
            ..
        })
    ));

    let dotted = document(json!({
        "_id": "i3",
        "_key": "!items!i3",
        "system": { "a.b": 1 }
    }));
    assert!(matches!(
        db.store_document(&dotted, "x"),
        Err(Error::Codec { .. })
    ));

    assert_eq!(db.count_rows(Table::Documents).unwrap(), 0);
}

#[test]
fn test_journal_page_titles() {
    let mut db = CompendiumDb::open_memory().unwrap();
    let journal = document(json!({
        "_id": "j1",
        "name": "Campaign",
        "_key": "!journal!j1",
        "pages": [
            { "_id": "p1", "name": "Intro", "type": "text", "sort": 2,
              "title": { "show": true, "level": 1, "content": "Welcome" },
              "text": { "content": "<p>Hello</p>", "format": 1 } },
            { "_id": "p2", "name": "Secret", "type": "text", "sort": 1,
              "title": { "show": false, "content": "Hidden" } },
            { "_id": "p3", "name": "Blank", "type": "image", "sort": 3,
              "title": { "show": true, "content": "" },
              "text": { "content": "", "format": 2 } }
        ]
    }));
    db.store_document(&journal, "lore").unwrap();

    let doc = db.reconstruct("j1").unwrap().unwrap();
    let pages = doc.pages.unwrap();
    let ids: Vec<_> = pages.iter().map(|page| page.id.as_str()).collect();
    assert_eq!(ids, ["p2", "p1", "p3"]);

    assert_eq!(
        pages[0].title,
        Some(PageTitle {
            show: false,
            content: String::new()
        })
    );
    assert_eq!(pages[0].text.as_ref().unwrap().format, 1);
    assert_eq!(pages[1].stored_title(), Some("Welcome"));
    assert_eq!(pages[1].text.as_ref().unwrap().content, "<p>Hello</p>");
    assert_eq!(pages[2].title.as_ref().map(|title| title.show), Some(true));
    assert_eq!(pages[2].text.as_ref().unwrap().format, 2);
    assert_eq!(pages[1].key, "!journal.pages!j1.p1");
}

#[test]
fn test_table_results_ordered_by_range() {
    let mut db = CompendiumDb::open_memory().unwrap();
    let table = document(json!({
        "_id": "t1",
        "name": "Treasure",
        "_key": "!tables!t1",
        "results": [
            { "_id": "a", "type": "text", "text": "Gold", "range": [5, 10], "weight": 3 },
            { "_id": "z", "type": 0, "text": "Gem", "range": [1, 4], "drawn": true },
            { "_id": "m", "type": 0, "text": "Copper", "range": [1, 1],
              "flags": { "core": { "tag": 1 } } }
        ]
    }));
    db.store_document(&table, "tables").unwrap();

    let results = db.reconstruct("t1").unwrap().unwrap().results.unwrap();
    let ids: Vec<_> = results.iter().map(|result| result.id.as_str()).collect();
    assert_eq!(ids, ["m", "z", "a"]);
    assert_eq!(results[0].range, [Some(1), Some(1)]);
    assert_eq!(results[0].flags, table.results.as_ref().unwrap()[2].flags);
    assert_eq!(results[1].kind, Some(ResultType::Code(0)));
    assert!(results[1].drawn);
    assert_eq!(results[1].weight, 1);
    assert_eq!(results[2].kind, Some(ResultType::Name("text".into())));
    assert_eq!(results[2].weight, 3);
    assert_eq!(results[2].key, "!tables.results!t1.a");
}

#[test]
fn test_export_enumeration_and_orphans() {
    let mut db = CompendiumDb::open_memory().unwrap();
    db.store_document(&actor(), "monsters").unwrap();
    let sword = document(json!({
        "_id": "s1", "name": "Sword", "type": "weapon", "_key": "!items!s1",
        "system": { "damage": "d8" }
    }));
    let axe = document(json!({
        "_id": "x1", "name": "Axe", "type": "weapon", "_key": "!items!x1"
    }));
    db.store_document(&sword, "gear").unwrap();
    db.store_document(&axe, "gear").unwrap();

    db.connection()
        .execute_batch(
            r#"
            INSERT INTO documents (id, name, document_type, compendium) VALUES ('o1', NULL, 'items', NULL);
            INSERT INTO system_data (document_id, key, value, value_type) VALUES ('o1', 'x', '1', 'number');
            "#,
        )
        .unwrap();

    assert_eq!(db.compendiums().unwrap(), ["gear", "monsters"]);
    assert_eq!(db.compendium_document_ids("gear").unwrap(), ["x1", "s1"]);
    assert!(db.compendium_document_ids("nowhere").unwrap().is_empty());

    let health = db.health().unwrap();
    assert_eq!(health.total_documents, 4);
    assert_eq!(health.compendiums, 2);
    assert_eq!(health.orphans, 1);
    assert_eq!(health.null_names, 1);
    assert_eq!(health.null_types, 1);
    assert!(!health.is_healthy());

    let removed = db.remove_orphans().unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].id, "o1");
    assert_eq!(rows_for(&db, "o1"), 0);
    assert!(db.health().unwrap().is_healthy());
    assert!(db.remove_orphans().unwrap().is_empty());

    let summary = db.summary().unwrap();
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].compendium, "gear");
    assert_eq!(summary[0].documents, 2);
    assert_eq!(summary[1].document_type, "actors");
}

#[test]
fn test_child_rows_resolve_to_documents() {
    let mut db = CompendiumDb::open_memory().unwrap();
    db.store_document(&actor(), "monsters").unwrap();
    assert!(db.dangling_rows().unwrap().is_empty());

    let err = db.connection().execute(
        "INSERT INTO embedded_items (actor_id, id) VALUES ('ghost', 'i1')",
        [],
    );
    assert!(err.is_err());

    db.connection()
        .execute_batch(
            r#"
            PRAGMA foreign_keys = OFF;
            INSERT INTO effects (document_id, id, data) VALUES ('ghost', 'e1', '{}');
            PRAGMA foreign_keys = ON;
            "#,
        )
        .unwrap();
    assert_eq!(db.dangling_rows().unwrap(), [(Table::Effects, 1)]);
    assert_eq!(db.health().unwrap().dangling_rows, 1);

    db.connection()
        .execute("DELETE FROM documents WHERE id = 'a1'", [])
        .unwrap();
    assert_eq!(db.count_rows_for(Table::EmbeddedItems, "a1").unwrap(), 0);
    assert_eq!(db.count_rows_for(Table::SystemData, "a1").unwrap(), 0);
}

#[test]
fn test_corrupted_type_tag() {
    let mut db = CompendiumDb::open_memory().unwrap();
    db.store_document(&actor(), "monsters").unwrap();
    db.connection()
        .execute(
            "UPDATE system_data SET value_type = 'bogus' WHERE document_id = 'a1' AND key = 'hp.max'",
            [],
        )
        .unwrap();

    let err = db.reconstruct("a1").unwrap_err();
    assert!(matches!(err, Error::Decode { ref key, .. } if key == "hp.max"));
}

#[test]
fn test_update_system_value() {
    let mut db = CompendiumDb::open_memory().unwrap();
    db.store_document(&actor(), "monsters").unwrap();

    assert!(db.update_system_value("a1", "hp.max", &json!(12)).unwrap());
    assert!(!db.update_system_value("a1", "hp.temp", &json!(1)).unwrap());
    assert!(matches!(
        db.update_system_value("a1", "hp", &json!({ "max": 1 })),
        Err(Error::Codec { .. })
    ));

    let doc = db.reconstruct("a1").unwrap().unwrap();
    assert_eq!(doc.system["hp"]["max"], json!(12));
    assert_eq!(doc.system["hp"]["value"], json!(7));
}

#[test]
fn test_lookups() {
    let mut db = CompendiumDb::open_memory().unwrap();
    db.store_document(&actor(), "monsters").unwrap();
    let sword = document(json!({
        "_id": "s1", "name": "Sword", "type": "weapon", "_key": "!items!s1",
        "system": { "damage": "d8" }
    }));
    db.store_document(&sword, "gear").unwrap();

    let weapons = db.documents_by_type("weapon").unwrap();
    assert_eq!(weapons.len(), 1);
    assert_eq!(weapons[0].compendium.as_deref(), Some("gear"));

    let actors = db.documents_by_document_type("actors").unwrap();
    assert_eq!(actors[0].id, "a1");

    let entries = db.system_entries("a1").unwrap();
    let keys: Vec<_> = entries.iter().map(|entry| entry.key.as_str()).collect();
    assert_eq!(keys, ["hp.max", "hp.value", "notes", "skills", "traits"]);

    let with_damage = db.documents_with_key("damage").unwrap();
    assert_eq!(with_damage.len(), 1);
    assert_eq!(with_damage[0].0, "s1");
    assert_eq!(with_damage[0].1.decode().unwrap(), json!("d8"));

    assert_eq!(db.embedded_items("a1").unwrap().len(), 2);
}

#[test]
fn test_on_disk_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compendium-db").join("compendiums.db");

    assert!(matches!(
        CompendiumDb::open(&path, OpenMode::ReadOnly),
        Err(Error::DatabaseNotFound(_))
    ));

    {
        let mut db = CompendiumDb::open(&path, OpenMode::Create).unwrap();
        assert!(!db.has_schema().unwrap());
        db.create_schema().unwrap();
        db.store_document(&actor(), "monsters").unwrap();
        assert!(!db.has_indexes().unwrap());
        db.create_indexes().unwrap();
        assert!(db.has_indexes().unwrap());
    }

    let db = CompendiumDb::open(&path, OpenMode::ReadOnly).unwrap();
    assert!(db.has_schema().unwrap());
    let doc = db.reconstruct("a1").unwrap().unwrap();
    assert_eq!(doc.items.unwrap().len(), 2);
}

#[test]
fn test_unmapped_fields_are_dropped() {
    let mut db = CompendiumDb::open_memory().unwrap();
    let mut doc = actor();
    doc.extra
        .insert("prototypeToken".into(), json!({ "name": "Goblin", "width": 1 }));

    db.store_document(&doc, "monsters").unwrap();

    let restored = db.reconstruct("a1").unwrap().unwrap();
    assert!(restored.extra.is_empty());
    let restored_items: Vec<_> = restored.items.clone().unwrap().into_iter().map(|i| i.id).collect();
    assert_eq!(restored_items, ["sword", "shield"]);
    assert_eq!(restored.system, doc.system);
    assert_eq!(restored.name.as_deref(), Some("Goblin"));
}
