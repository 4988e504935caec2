//! Documents ready for indexing.

use stark_kb::{KbError, KnowledgeBase};

/// A knowledge base node rendered for indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDocument {
    /// Node id in the knowledge base.
    pub node_id: u64,
    /// Node type name.
    pub node_type: String,
    /// Node label.
    pub title: String,
    /// Compact document text including relations.
    pub body: String,
}

impl NodeDocument {
    /// Renders node `id` of `kb`.
    pub fn from_kb(kb: &dyn KnowledgeBase, id: usize) -> Result<Self, KbError> {
        let graph = kb.graph();
        Ok(Self {
            node_id: id as u64,
            node_type: graph.node_type_of(id)?.to_string(),
            title: kb.title(id)?.to_string(),
            body: kb.doc_info(id, true, true)?,
        })
    }
}
