//! Full indexing pipeline.
//!
//! [`build_index`] renders every candidate node of a knowledge base, replaces the index
//! contents with those documents and records the config hash.

use std::path::Path;

use stark_config::Config;
use stark_kb::KnowledgeBase;
use tracing::{info, warn};

use crate::{
    IndexError, IndexWriter, compute_config_hash, document::NodeDocument, write_config_hash,
};

/// Statistics from an indexing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of candidate nodes indexed.
    pub nodes_indexed: usize,
    /// Number of nodes in the knowledge base.
    pub nodes_total: usize,
}

/// Callback for reporting indexing progress.
pub trait ProgressReporter {
    /// Called before indexing node `current` of `total` candidates (1-based).
    fn on_node(&mut self, node_id: usize, current: usize, total: usize);

    /// Called when indexing is complete.
    fn on_complete(&mut self, stats: &IndexStats);
}

/// A no-op progress reporter for silent indexing.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn on_node(&mut self, _node_id: usize, _current: usize, _total: usize) {}
    fn on_complete(&mut self, _stats: &IndexStats) {}
}

/// Rebuilds the index in `index_dir` from the candidate nodes of `kb`.
///
/// Existing documents are deleted first. A node that fails to render rolls the writer back,
/// leaving the previous commit in place. The config hash is written only after the commit
/// succeeds, so an interrupted build reads as stale.
pub fn build_index<R: ProgressReporter>(
    kb: &dyn KnowledgeBase,
    index_dir: &Path,
    config: &Config,
    reporter: &mut R,
) -> Result<IndexStats, IndexError> {
    let mut writer = IndexWriter::open(index_dir, &config.search.stemmer)?;
    writer.delete_all()?;

    let candidates = kb.graph().candidate_ids();
    let total = candidates.len();
    if let Err(e) = add_candidates(&mut writer, kb, &candidates, reporter) {
        if let Err(rollback) = writer.rollback() {
            warn!(error = %rollback, "rollback after failed indexing run failed");
        }
        return Err(e);
    }
    writer.commit()?;
    write_config_hash(index_dir, &compute_config_hash(config))?;

    let stats = IndexStats {
        nodes_indexed: total,
        nodes_total: kb.graph().num_nodes(),
    };
    info!(
        dataset = kb.name(),
        indexed = stats.nodes_indexed,
        dir = %index_dir.display(),
        "index built"
    );
    reporter.on_complete(&stats);
    Ok(stats)
}

/// Adds the documents of `candidates`, reporting each before it is rendered.
fn add_candidates<R: ProgressReporter>(
    writer: &mut IndexWriter,
    kb: &dyn KnowledgeBase,
    candidates: &[usize],
    reporter: &mut R,
) -> Result<(), IndexError> {
    let total = candidates.len();
    for (position, &id) in candidates.iter().enumerate() {
        reporter.on_node(id, position + 1, total);
        writer.add_node(&NodeDocument::from_kb(kb, id)?)?;
    }
    Ok(())
}
