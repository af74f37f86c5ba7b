// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Export pass: stored documents back into packed compendiums.

use std::fs;
use std::path::Path;

use chrono::Utc;
use grimoire_store_db::{CompendiumDb, OpenMode, document_type_of};
use log::{error, info, warn};

use crate::backup::backup_packs;
use crate::config::Config;
use crate::error::{IoErrorContext, PackerError, Result};
use crate::filename::document_filename;
use crate::report::{DocumentFailure, ExportReport, PackOutcome};
use crate::staging::{ScopedDir, is_plain_name};
use crate::tool::PackTool;

/// Write one stored document into `staging` as pretty-printed JSON.
fn stage_document(db: &CompendiumDb, staging: &Path, id: &str) -> Result<()> {
    let doc = db
        .reconstruct(id)?
        .ok_or_else(|| grimoire_store_db::Error::DocumentNotFound(id.to_owned()))?;
    let document_type = document_type_of(&doc.key, &doc.id)?;
    let filename = document_filename(&doc, document_type);
    if !is_plain_name(&filename) {
        return Err(PackerError::InvalidName {
            what: "document file name",
            name: filename,
        });
    }
    let path = staging.join(filename);
    let contents = serde_json::to_string_pretty(&doc).map_err(|source| PackerError::Serialize {
        id: doc.id.clone(),
        source,
    })?;
    fs::write(&path, contents).io_context(format!("Failed to write {}", path.display()))
}

fn export_pack(
    db: &CompendiumDb,
    tool: &dyn PackTool,
    packs_dir: &Path,
    temp_root: &Path,
    outcome: &mut PackOutcome,
) -> Result<()> {
    let name = outcome.name.clone();
    if !is_plain_name(&name) {
        return Err(PackerError::InvalidName {
            what: "pack name",
            name,
        });
    }
    let staging = ScopedDir::create(temp_root.join(&name))?;

    let ids = db.compendium_document_ids(&name)?;
    info!("Found {} documents in {name}", ids.len());
    let mut staged = 0;
    for id in ids {
        match stage_document(db, staging.path(), &id) {
            Ok(()) => staged += 1,
            Err(e) => outcome.failures.push(DocumentFailure {
                subject: id,
                error: e,
            }),
        }
    }
    if !outcome.failures.is_empty() {
        return Err(PackerError::Incomplete {
            pack: name,
            failed: outcome.failures.len(),
        });
    }

    tool.compile(staging.path(), &name, &packs_dir.join(&name))?;
    outcome.documents = staged;
    Ok(())
}

/// Rebuild the `selected` packs, or every compendium of the store when empty.
///
/// Existing output of every selected pack is backed up before anything is
/// staged; a failed backup aborts the pass. Pack names that are not a single
/// path component fail on their own without touching the filesystem.
pub fn export(config: &Config, tool: &dyn PackTool, selected: &[String]) -> Result<ExportReport> {
    let db = CompendiumDb::open(&config.db_path, OpenMode::ReadOnly)?;

    let all = db.compendiums()?;
    info!("Found {} compendiums in database", all.len());
    let packs = if selected.is_empty() {
        all
    } else {
        info!("Processing selected: {}", selected.join(", "));
        selected.to_vec()
    };

    let backupable: Vec<String> = packs
        .iter()
        .filter(|name| is_plain_name(name))
        .cloned()
        .collect();
    let backup_dir = backup_packs(&config.packs_dir, &config.backup_dir, &backupable, Utc::now())?;

    let temp_root = ScopedDir::create(&config.pack_temp_dir)?;
    fs::create_dir_all(&config.packs_dir)
        .io_context(format!("Failed to create {}", config.packs_dir.display()))?;

    let mut report = ExportReport {
        packs: Vec::new(),
        backup_dir,
    };
    for (i, name) in packs.iter().enumerate() {
        info!("[{}/{}] Processing {name}", i + 1, packs.len());
        let mut outcome = PackOutcome::new(name.as_str());
        match export_pack(&db, tool, &config.packs_dir, temp_root.path(), &mut outcome) {
            Ok(()) => info!("Packed {name}: {} documents", outcome.documents),
            Err(e) => {
                for failure in &outcome.failures {
                    error!("{name}: document {}: {}", failure.subject, failure.error);
                }
                error!("Failed to pack {name}: {e}");
                outcome.error = Some(e);
            }
        }

        let failed = !outcome.is_ok();
        report.packs.push(outcome);
        if failed && config.fail_fast {
            warn!("Stopping after failure in {name}");
            break;
        }
    }

    Ok(report)
}
