// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Ingest pass: packed compendiums into the relational store.

use std::fs;
use std::path::{Path, PathBuf};

use grimoire_store_db::{CompendiumDb, Document, OpenMode};
use log::{error, info, warn};

use crate::config::Config;
use crate::error::{IoErrorContext, PackerError, Result};
use crate::report::{DocumentFailure, IngestReport, PackOutcome};
use crate::staging::ScopedDir;
use crate::tool::PackTool;

/// Names of the pack directories under `packs_dir`, sorted, without ignored entries.
pub fn list_packs(packs_dir: &Path, ignore: &[String]) -> Result<Vec<String>> {
    let context = || format!("Failed to list packs in {}", packs_dir.display());
    let mut packs = Vec::new();
    for entry in fs::read_dir(packs_dir).io_context(context())? {
        let entry = entry.io_context(context())?;
        if !entry.file_type().io_context(context())?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !ignore.contains(&name) {
            packs.push(name);
        }
    }
    packs.sort();
    Ok(packs)
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let context = || format!("Failed to read extracted documents in {}", dir.display());
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).io_context(context())? {
        let entry = entry.io_context(context())?;
        let path = entry.path();
        if entry.file_type().io_context(context())?.is_file()
            && path.extension().is_some_and(|ext| ext == "json")
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn parse_document(path: &Path) -> Result<Document> {
    let contents =
        fs::read_to_string(path).io_context(format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).map_err(|source| PackerError::Document {
        path: path.to_owned(),
        source,
    })
}

fn ingest_pack(
    db: &mut CompendiumDb,
    tool: &dyn PackTool,
    config: &Config,
    temp_root: &Path,
    outcome: &mut PackOutcome,
) -> Result<()> {
    let name = outcome.name.clone();
    let work = ScopedDir::create(temp_root.join(&name))?;
    tool.extract(&config.packs_dir.join(&name), &name, work.path())?;

    for path in json_files(work.path())? {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let doc = match parse_document(&path) {
            Ok(doc) => doc,
            Err(e) => {
                outcome.failures.push(DocumentFailure {
                    subject: file_name,
                    error: e,
                });
                continue;
            }
        };
        match db.store_document(&doc, &name) {
            Ok(_) => outcome.documents += 1,
            Err(e) => {
                let subject = if doc.id.is_empty() { file_name } else { doc.id };
                outcome.failures.push(DocumentFailure {
                    subject,
                    error: e.into(),
                });
            }
        }
    }
    Ok(())
}

/// Extract every pack and store its documents.
///
/// Indexes are built only if every pack was ingested without failures.
pub fn ingest(config: &Config, tool: &dyn PackTool) -> Result<IngestReport> {
    let temp_root = ScopedDir::create(&config.unpack_temp_dir)?;
    let mut db = CompendiumDb::open(&config.db_path, OpenMode::Create)?;
    db.create_schema()?;

    let packs = list_packs(&config.packs_dir, &config.ignore)?;
    info!("Found {} compendium packs to process", packs.len());

    let mut report = IngestReport::default();
    for (i, name) in packs.iter().enumerate() {
        info!("[{}/{}] Unpacking {name}", i + 1, packs.len());
        let mut outcome = PackOutcome::new(name.as_str());
        if let Err(e) = ingest_pack(&mut db, tool, config, temp_root.path(), &mut outcome) {
            error!("Failed to ingest {name}: {e}");
            outcome.error = Some(e);
        }
        for failure in &outcome.failures {
            error!("{name}: document {}: {}", failure.subject, failure.error);
        }
        info!("Processed {name}: {} documents stored", outcome.documents);

        let failed = !outcome.is_ok();
        report.packs.push(outcome);
        if failed && config.fail_fast {
            warn!("Stopping after failure in {name}");
            break;
        }
    }

    if report.is_success() && report.packs.len() == packs.len() {
        info!("Creating indexes");
        db.create_indexes()?;
        report.indexed = true;
    } else {
        warn!("Skipping index creation: not every pack was ingested");
    }

    Ok(report)
}
