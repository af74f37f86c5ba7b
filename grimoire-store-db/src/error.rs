// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Error types for compendium store operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for compendium store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during compendium store operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to open database with context
    #[error("Failed to open database at '{path}': {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to create the directory holding the database
    #[error("Failed to create database directory '{path}': {source}")]
    DatabaseDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Database file not found
    #[error("Database not found at: {0}")]
    DatabaseNotFound(PathBuf),

    /// A document write failed and was rolled back
    #[error("Transaction for document '{document_id}' rolled back: {source}")]
    Transaction {
        document_id: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Body flattening or unflattening failed
    #[error("Document '{document_id}': {source}")]
    Codec {
        document_id: String,
        #[source]
        source: grimoire_codec::Error,
    },

    /// A stored value type tag could not be read
    #[error("Document '{document_id}', key '{key}': {source}")]
    Decode {
        document_id: String,
        key: String,
        #[source]
        source: grimoire_codec::DecodeError,
    },

    /// A stored JSON column could not be parsed
    #[error("Document '{document_id}': invalid JSON in {column}: {source}")]
    Json {
        document_id: String,
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Synthetic `_key` is malformed or names another document
    #[error("Invalid document key '{key}' for document '{document_id}'")]
    InvalidKey { document_id: String, key: String },

    /// Document has no `_id`
    #[error("Document without an id")]
    MissingDocumentId,

    /// Embedded entry has no `_id`
    #[error("Document '{document_id}' has an entry in '{collection}' without an id")]
    MissingId {
        document_id: String,
        collection: &'static str,
    },

    /// Document carries a child collection its document type does not own
    #[error("Document '{document_id}' of type '{document_type}' cannot carry '{collection}'")]
    UnexpectedCollection {
        document_id: String,
        document_type: String,
        collection: &'static str,
    },

    /// Document not found
    #[error("Document not found: {0}")]
    DocumentNotFound(String),
}

impl Error {
    /// Wrap storage failures of a document write as a rolled-back transaction.
    pub(crate) fn in_transaction(self, document_id: &str) -> Self {
        match self {
            Error::Sqlite(source) => Error::Transaction {
                document_id: document_id.to_owned(),
                source,
            },
            other => other,
        }
    }
}
