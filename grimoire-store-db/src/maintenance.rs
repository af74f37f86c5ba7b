// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Store maintenance: orphan cleanup, health checks and summaries.

use tracing::{debug, info};

use crate::connection::CompendiumDb;
use crate::error::Result;
use crate::schema::Table;
use crate::types::DocumentSummary;

/// Counts reported by [`CompendiumDb::health`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthStats {
    pub total_documents: u64,
    pub compendiums: u64,
    /// Documents without a compendium, awaiting cleanup
    pub orphans: u64,
    pub null_names: u64,
    pub null_types: u64,
    /// Child rows whose document no longer exists
    pub dangling_rows: u64,
}

impl HealthStats {
    pub fn is_healthy(&self) -> bool {
        self.orphans == 0 && self.dangling_rows == 0
    }
}

/// Document count of one compendium and document type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub compendium: String,
    pub document_type: String,
    pub documents: u64,
}

impl CompendiumDb {
    /// Delete documents without a compendium, with all their child rows.
    ///
    /// Returns the removed documents.
    pub fn remove_orphans(&mut self) -> Result<Vec<DocumentSummary>> {
        let tx = self.conn.transaction()?;
        let orphans = {
            let mut stmt = tx.prepare(
                r#"
                SELECT id, name, type, document_type, compendium
                FROM documents
                WHERE compendium IS NULL
                ORDER BY id
                "#,
            )?;
            stmt.query_map([], |row| {
                Ok(DocumentSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    kind: row.get(2)?,
                    document_type: row.get(3)?,
                    compendium: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        if orphans.is_empty() {
            debug!("No orphaned documents");
            return Ok(orphans);
        }

        // Cascades cover databases opened with foreign keys enforced; delete
        // the children explicitly for those that were not.
        for table in Table::CHILDREN {
            tx.execute(
                &format!(
                    "DELETE FROM {} WHERE {} IN (SELECT id FROM documents WHERE compendium IS NULL)",
                    table.name(),
                    table.document_column()
                ),
                [],
            )?;
        }
        tx.execute("DELETE FROM documents WHERE compendium IS NULL", [])?;
        tx.commit()?;

        info!("Removed {} orphaned documents", orphans.len());
        Ok(orphans)
    }

    /// Child rows, per table, whose document row is missing.
    pub fn dangling_rows(&self) -> Result<Vec<(Table, u64)>> {
        let mut dangling = Vec::new();
        for table in Table::CHILDREN {
            let count: i64 = self.conn.query_row(
                &format!(
                    "SELECT COUNT(*) FROM {0} WHERE {1} NOT IN (SELECT id FROM documents)",
                    table.name(),
                    table.document_column()
                ),
                [],
                |row| row.get(0),
            )?;
            if count > 0 {
                dangling.push((table, count as u64));
            }
        }
        Ok(dangling)
    }

    pub fn health(&self) -> Result<HealthStats> {
        let (total_documents, compendiums, orphans, null_names, null_types): (
            i64,
            i64,
            i64,
            i64,
            i64,
        ) = self.conn.query_row(
            r#"
            SELECT
                COUNT(*),
                COUNT(DISTINCT compendium),
                COALESCE(SUM(compendium IS NULL), 0),
                COALESCE(SUM(name IS NULL), 0),
                COALESCE(SUM(type IS NULL), 0)
            FROM documents
            "#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
        )?;

        let dangling_rows = self.dangling_rows()?.iter().map(|(_, n)| n).sum();

        Ok(HealthStats {
            total_documents: total_documents as u64,
            compendiums: compendiums as u64,
            orphans: orphans as u64,
            null_names: null_names as u64,
            null_types: null_types as u64,
            dangling_rows,
        })
    }

    /// Document counts per compendium and document type.
    pub fn summary(&self) -> Result<Vec<SummaryRow>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT compendium, document_type, COUNT(*)
            FROM documents
            WHERE compendium IS NOT NULL
            GROUP BY compendium, document_type
            ORDER BY compendium, document_type
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SummaryRow {
                    compendium: row.get(0)?,
                    document_type: row.get(1)?,
                    documents: row.get::<_, i64>(2)? as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}
