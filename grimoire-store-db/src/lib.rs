// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! SQLite relational store for unpacked compendium documents.
//!
//! This crate stores compendium documents as normalized rows and rebuilds
//! them into the per-document JSON shape the pack compiler consumes.
//!
//! **Architecture**: document bodies are flattened into one `system_data` row
//! per leaf (see `grimoire-codec`); embedded children get typed tables.
//!
//! # Key Features
//!
//! - Transactional, idempotent document writes
//! - Faithful reconstruction with stable child ordering
//! - Lookups by type, document type, compendium and body key
//! - Orphan cleanup and health reporting
//! - In-memory database for testing
//!
//! # Example
//!
//! ```ignore
//! use grimoire_store_db::{CompendiumDb, OpenMode};
//!
//! let mut db = CompendiumDb::open("compendiums.db", OpenMode::Create)?;
//! db.create_schema()?;
//! db.store_document(&doc, "monsters")?;
//!
//! if let Some(doc) = db.reconstruct("abc123")? {
//!     println!("{}", serde_json::to_string_pretty(&doc)?);
//! }
//! ```

mod connection;
mod error;
mod key;
mod maintenance;
mod query;
mod schema;
mod types;
mod write;

pub use connection::{CompendiumDb, OpenMode};
pub use error::{Error, Result};
pub use key::{Embedded, document_key, document_type_of, embedded_key};
pub use maintenance::{HealthStats, SummaryRow};
pub use schema::{INDEX_NAMES, Table};
pub use types::*;
