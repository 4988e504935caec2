//! Semi-structured knowledge bases for stark.
//!
//! This crate builds and serves knowledge bases whose nodes carry free text and whose edges
//! carry typed relations. It provides:
//! - The graph model (`SemiStructKb`) with per-relation neighbor queries
//! - The Amazon product pipeline: raw dump reading, processing, meta links and download
//! - Document, relation and chunk rendering for retrieval
//! - JSON persistence of processed graphs and meta-link caches

#![warn(missing_docs)]

pub mod amazon;
mod brand;
mod error;
mod graph;
mod node;
pub mod pyliteral;
mod registry;
pub mod store;
mod text;

pub use amazon::{
    AmazonKb, AmazonPaths,
    categories::{
        COMMON_CATEGORIES, CategorySelection, QA_CATEGORIES, REVIEW_CATEGORIES,
        resolve_categories,
    },
    download::{DEFAULT_QA_BASE, DEFAULT_REVIEW_BASE, DownloadSource, fetch_raw, raw_file_urls},
    meta_links::SUPPORTED_META_LINKS,
    render::DocRenderer,
};
pub use brand::{brands_match, normalize_brand};
pub use error::KbError;
pub use graph::{EdgeIndex, ProcessedData, SemiStructKb};
pub use node::{Entity, NodeInfo, Product, QaEntry, Review};
pub use registry::{
    DEFAULT_MAX_ENTRIES, DatasetOptions, KnowledgeBase, SUPPORTED_DATASETS, load_dataset,
};
pub use text::{clean_list, clean_text, compact_text};
