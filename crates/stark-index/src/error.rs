//! Error types for the stark-index crate.

use std::{io, path::PathBuf};

use stark_kb::KbError;
use thiserror::Error;

/// Errors that can occur when working with the retrieval index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Failed to open or create the index.
    #[error("failed to open index at {path}: {message}")]
    OpenIndex {
        /// Path to the index directory.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Failed to write to the index.
    #[error("failed to write to index: {0}")]
    Write(String),

    /// Failed to commit changes to the index.
    #[error("failed to commit index: {0}")]
    Commit(String),

    /// Failed to execute a search.
    #[error("search failed: {0}")]
    Search(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid stemmer language.
    #[error("unsupported stemmer language: {0}")]
    InvalidLanguage(String),

    /// No configuration root, so there is nowhere to put the index.
    #[error("no .stark.toml found; run `stark init` first")]
    NoConfigRoot,

    /// The knowledge base failed while rendering a node.
    #[error(transparent)]
    Kb(#[from] KbError),

    /// Failed to read a query file.
    #[error("failed to read query file {path}: {source}")]
    ReadQueries {
        /// Path to the query file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A query file line is not a valid query record.
    #[error("{path}:{line}: invalid query record: {source}")]
    InvalidQuery {
        /// Path to the query file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

impl IndexError {
    /// Creates an `OpenIndex` error from a path and Tantivy error.
    pub(crate) fn open_index(path: PathBuf, source: &tantivy::TantivyError) -> Self {
        Self::OpenIndex {
            path,
            message: source.to_string(),
        }
    }

    /// Creates a `Write` error from a Tantivy error.
    pub(crate) fn write(source: &tantivy::TantivyError) -> Self {
        Self::Write(source.to_string())
    }

    /// Creates a `Commit` error from a Tantivy error.
    pub(crate) fn commit(source: &tantivy::TantivyError) -> Self {
        Self::Commit(source.to_string())
    }

    /// Creates a `Search` error from a Tantivy error.
    pub(crate) fn search(source: &tantivy::TantivyError) -> Self {
        Self::Search(source.to_string())
    }
}
