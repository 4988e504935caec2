//! Error types for knowledge base construction and access.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when building, loading, or querying a knowledge base.
#[derive(Debug, Error)]
pub enum KbError {
    /// Failed to read or write a file.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to encode or decode a persisted JSON file.
    #[error("failed to (de)serialize {path}: {source}")]
    Json {
        /// Path of the JSON file.
        path: PathBuf,
        /// Underlying serde_json error.
        source: serde_json::Error,
    },

    /// A line of a raw data dump could not be parsed.
    #[error("{path}:{line}: {message}")]
    MalformedLine {
        /// Path of the raw file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Parser message.
        message: String,
    },

    /// A raw data file is missing and downloading is disabled.
    #[error("raw data file missing: {path} (enable downloads or run `stark fetch`)")]
    MissingRawFile {
        /// Expected location of the file.
        path: PathBuf,
    },

    /// A raw data file could not be downloaded.
    #[error("failed to download {url}: {message}")]
    Download {
        /// URL that failed.
        url: String,
        /// Failure description.
        message: String,
    },

    /// Requested categories are not available for this dataset.
    #[error("invalid categories: {}", categories.join(", "))]
    InvalidCategories {
        /// Offending category names.
        categories: Vec<String>,
    },

    /// A meta link type is not supported.
    #[error("unsupported meta link type: {0}")]
    UnsupportedMetaLink(String),

    /// A dataset name is not known.
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    /// A relation name is not present in the graph.
    #[error("unknown relation type: {0}")]
    UnknownRelation(String),

    /// A node id is outside the graph.
    #[error("node {id} out of range (graph has {num_nodes} nodes)")]
    NodeOutOfRange {
        /// Requested id.
        id: usize,
        /// Number of nodes in the graph.
        num_nodes: usize,
    },

    /// Processed data violates a structural invariant.
    #[error("inconsistent graph data: {0}")]
    InconsistentGraph(String),
}

impl KbError {
    /// Creates an `Io` error for a path.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
