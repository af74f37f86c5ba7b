// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Moves compendium packs between their packed form and the relational store.
//!
//! An ingest pass extracts every pack with the configured [`PackTool`] and
//! stores its documents; an export pass backs up the existing output,
//! stages the stored documents as JSON files and compiles them back into
//! packs. Temporary directories never outlive a pass.

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod filename;
pub mod ingest;
pub mod maintenance;
pub mod report;
pub mod staging;
pub mod tool;

pub use config::Config;
pub use error::{BackupError, ConfigError, PackerError, Result, ToolError};
pub use export::export;
pub use ingest::ingest;
pub use report::{DocumentFailure, ExportReport, IngestReport, PackOutcome};
pub use tool::{CommandTool, PackTool};
