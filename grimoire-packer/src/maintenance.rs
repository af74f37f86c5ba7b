// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Cleanup and reporting over the store.

use grimoire_store_db::{CompendiumDb, DocumentSummary, HealthStats, OpenMode, SummaryRow};
use log::{info, warn};

use crate::config::Config;
use crate::error::Result;

#[derive(Debug)]
pub struct CleanReport {
    pub removed: Vec<DocumentSummary>,
    /// Health of the store after cleanup
    pub health: HealthStats,
}

/// Remove orphaned documents and check what is left.
pub fn clean(config: &Config) -> Result<CleanReport> {
    let mut db = CompendiumDb::open(&config.db_path, OpenMode::ReadWrite)?;

    let removed = db.remove_orphans()?;
    for doc in &removed {
        info!(
            "Removed {} '{}' ({})",
            doc.document_type,
            doc.id,
            doc.name.as_deref().unwrap_or("unnamed")
        );
    }

    let health = db.health()?;
    info!(
        "{} documents in {} compendiums, {} without name, {} without type",
        health.total_documents, health.compendiums, health.null_names, health.null_types
    );
    for (table, rows) in db.dangling_rows()? {
        warn!("{rows} rows of {} belong to no document", table.name());
    }

    Ok(CleanReport { removed, health })
}

/// Document counts per compendium and document type.
pub fn summary(config: &Config) -> Result<Vec<SummaryRow>> {
    let db = CompendiumDb::open(&config.db_path, OpenMode::ReadOnly)?;
    Ok(db.summary()?)
}
