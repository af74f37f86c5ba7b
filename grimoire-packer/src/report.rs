// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Outcomes of ingest and export passes.

use std::path::PathBuf;

use crate::error::PackerError;

/// A document that could not be moved.
#[derive(Debug)]
pub struct DocumentFailure {
    /// Document id, or the file name when the id is unknown
    pub subject: String,
    pub error: PackerError,
}

#[derive(Debug)]
pub struct PackOutcome {
    pub name: String,
    /// Documents moved
    pub documents: usize,
    pub failures: Vec<DocumentFailure>,
    /// Error that stopped the pack
    pub error: Option<PackerError>,
}

impl PackOutcome {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: 0,
            failures: Vec::new(),
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.failures.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub packs: Vec<PackOutcome>,
    /// Lookup indexes were (re)built
    pub indexed: bool,
}

impl IngestReport {
    pub fn is_success(&self) -> bool {
        self.packs.iter().all(PackOutcome::is_ok)
    }

    pub fn documents(&self) -> usize {
        self.packs.iter().map(|pack| pack.documents).sum()
    }
}

#[derive(Debug)]
pub struct ExportReport {
    pub packs: Vec<PackOutcome>,
    pub backup_dir: PathBuf,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.packs.iter().all(PackOutcome::is_ok)
    }

    pub fn documents(&self) -> usize {
        self.packs.iter().map(|pack| pack.documents).sum()
    }
}
