// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Error types of the pack passes.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackerError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] grimoire_store_db::Error),

    #[error("Backup failed: {0}")]
    Backup(#[from] BackupError),

    #[error("Pack tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Failed to parse document {path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {what} '{name}': must be a single path component")]
    InvalidName { what: &'static str, name: String },

    #[error("{failed} documents of pack '{pack}' could not be staged")]
    Incomplete { pack: String, failed: usize },

    #[error("Failed to serialize document '{id}': {source}")]
    Serialize {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Failed to create backup directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to back up pack '{pack}' to {path}: {source}")]
    Copy {
        pack: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("No {operation} command configured")]
    EmptyCommand { operation: &'static str },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Extracting pack '{pack}' failed ({status}): {stderr}")]
    Extract {
        pack: String,
        status: String,
        stderr: String,
    },

    #[error("Compiling pack '{pack}' failed ({status}): {stderr}")]
    Compile {
        pack: String,
        status: String,
        stderr: String,
    },
}

pub type Result<T> = std::result::Result<T, PackerError>;

/// Extension trait for adding context to IO errors
pub trait IoErrorContext<T> {
    fn io_context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> IoErrorContext<T> for std::result::Result<T, std::io::Error> {
    fn io_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PackerError::Io {
            context: context.into(),
            source: e,
        })
    }
}
