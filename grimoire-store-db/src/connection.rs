// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Database connection management.

use std::path::Path;

use rusqlite::{Connection, OpenFlags, params};
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::{INDEX_NAMES, INDEX_SQL, SCHEMA_SQL, Table};

/// Database open mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read-only access (export passes, reporting)
    ReadOnly,
    /// Read-write access to an existing database
    ReadWrite,
    /// Create the database (and its directory) if it doesn't exist
    Create,
}

/// SQLite database holding unpacked compendium documents.
///
/// One handle is owned by a single pass; it is closed when dropped.
pub struct CompendiumDb {
    pub(crate) conn: Connection,
}

impl CompendiumDb {
    /// Open or create a database at a custom path.
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref();
        let flags = match mode {
            OpenMode::ReadOnly => {
                if !path.exists() {
                    return Err(Error::DatabaseNotFound(path.to_owned()));
                }
                OpenFlags::SQLITE_OPEN_READ_ONLY
            }
            OpenMode::ReadWrite => {
                if !path.exists() {
                    return Err(Error::DatabaseNotFound(path.to_owned()));
                }
                OpenFlags::SQLITE_OPEN_READ_WRITE
            }
            OpenMode::Create => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| Error::DatabaseDir {
                        path: parent.to_owned(),
                        source: e,
                    })?;
                }
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
            }
        };

        let conn = Connection::open_with_flags(path, flags).map_err(|e| Error::DatabaseOpen {
            path: path.to_owned(),
            source: e,
        })?;
        let db = Self { conn };

        match mode {
            OpenMode::Create => db.configure_pragmas()?,
            OpenMode::ReadWrite => db.conn.execute_batch("PRAGMA foreign_keys = ON;")?,
            OpenMode::ReadOnly => {}
        }

        debug!("Opened database at {} ({:?})", path.display(), mode);
        Ok(db)
    }

    /// Create an in-memory database (for testing).
    ///
    /// The database is initialized with the full schema and indexes.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.configure_pragmas()?;
        db.create_schema()?;
        db.create_indexes()?;
        debug!("Created in-memory database");
        Ok(db)
    }

    fn configure_pragmas(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
            "#,
        )?;
        Ok(())
    }

    /// Create the tables if they don't exist yet.
    pub fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        debug!("Created database schema");
        Ok(())
    }

    /// Create the lookup indexes if they don't exist yet.
    pub fn create_indexes(&self) -> Result<()> {
        self.conn.execute_batch(INDEX_SQL)?;
        debug!("Created database indexes");
        Ok(())
    }

    /// Get raw connection (for advanced usage).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Check if the database has every table of the schema.
    pub fn has_schema(&self) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
        for table in Table::ALL {
            let count: i64 = stmt.query_row(params![table.name()], |row| row.get(0))?;
            if count == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Check if the database has every lookup index.
    pub fn has_indexes(&self) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = ?1")?;
        for index in INDEX_NAMES {
            let count: i64 = stmt.query_row(params![index], |row| row.get(0))?;
            if count == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
