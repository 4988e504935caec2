//! Tantivy-based retrieval index for stark knowledge bases.
//!
//! This crate indexes the rendered documents of candidate nodes and answers free-text
//! queries with ranked node ids. It handles:
//! - Index creation, writing and full rebuilds from a [`stark_kb::KnowledgeBase`]
//! - BM25 search with a boosted title field
//! - Index location and config-hash freshness tracking
//! - Evaluation of rankings against labeled queries
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use stark_index::Searcher;
//!
//! let searcher = Searcher::open(Path::new(".stark/index"), "english").unwrap();
//! for hit in searcher.search("waterproof tent", 5).unwrap() {
//!     println!("{} {}", hit.node_id, hit.title);
//! }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config_hash;
mod document;
mod error;
pub mod eval;
mod indexer;
mod location;
mod schema;
mod search;
mod status;
#[cfg(test)]
mod test_support;
mod writer;

pub use analyzer::{STEMMER_LANGUAGES, parse_language};
pub use config_hash::{IndexingConfig, SCHEMA_VERSION, compute_config_hash};
pub use document::NodeDocument;
pub use error::IndexError;
pub use eval::{EvalQuery, EvalReport, Metrics, evaluate, read_queries};
pub use indexer::{IndexStats, ProgressReporter, SilentReporter, build_index};
pub use location::{config_hash_path, index_directory};
pub use search::{Hit, Searcher};
pub use status::{
    IndexStatus, detect_index_status, index_exists, read_stored_hash, write_config_hash,
};
pub use writer::IndexWriter;
