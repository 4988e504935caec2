//! Dataset selection by name.

use std::path::Path;

pub use stark_config::DEFAULT_MAX_ENTRIES;
use stark_config::{DEFAULT_CATEGORIES, DEFAULT_META_LINK_TYPES};

use crate::{
    amazon::{AmazonKb, download::DownloadSource},
    error::KbError,
    graph::SemiStructKb,
};

/// Names accepted by [`load_dataset`].
pub const SUPPORTED_DATASETS: [&str; 1] = ["amazon"];

/// Settings for building or loading a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetOptions {
    /// Categories to load, or `all`.
    pub categories: Vec<String>,
    /// Meta link types to add, in order.
    pub meta_link_types: Vec<String>,
    /// Maximum reviews and Q&A entries per rendered document.
    pub max_entries: usize,
    /// Whether relations are traversable in both directions.
    pub indirected: bool,
    /// Where to fetch missing raw files from; `None` disables downloading.
    pub download: Option<DownloadSource>,
    /// Discard processed data and rebuild from the raw files.
    pub force: bool,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            categories: to_strings(DEFAULT_CATEGORIES),
            meta_link_types: to_strings(DEFAULT_META_LINK_TYPES),
            max_entries: DEFAULT_MAX_ENTRIES,
            indirected: true,
            download: None,
            force: false,
        }
    }
}

/// Owned copies of a constant list.
fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

/// A loaded knowledge base: a graph plus text renderings of its nodes.
pub trait KnowledgeBase {
    /// Dataset name.
    fn name(&self) -> &'static str;

    /// The underlying graph.
    fn graph(&self) -> &SemiStructKb;

    /// Document text of a node, optionally with relations and flattened to one line.
    fn doc_info(&self, id: usize, add_rel: bool, compact: bool) -> Result<String, KbError>;

    /// Relation summary of a node.
    fn rel_info(&self, id: usize) -> Result<String, KbError>;

    /// Prose rendering of one node attribute.
    fn chunk_info(&self, id: usize, attribute: &str) -> Result<String, KbError>;

    /// Attributes accepted by [`KnowledgeBase::chunk_info`].
    fn chunk_attributes(&self) -> &'static [&'static str];

    /// Short label of a node.
    fn title(&self, id: usize) -> Result<&str, KbError> {
        Ok(self.graph().node(id)?.label())
    }
}

/// Loads the dataset `name` from `<data_root>/<name>`.
pub fn load_dataset(
    name: &str,
    data_root: &Path,
    options: &DatasetOptions,
) -> Result<Box<dyn KnowledgeBase>, KbError> {
    match name {
        "amazon" => Ok(Box::new(AmazonKb::load(&data_root.join(name), options)?)),
        other => Err(KbError::UnknownDataset(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use stark_config::Config;

    use super::*;
    use crate::amazon::fixtures::write_sample_raw;

    #[test]
    fn loads_amazon_under_data_root() {
        let dir = tempfile::tempdir().unwrap();
        write_sample_raw(&dir.path().join("amazon/raw"));

        let kb = load_dataset("amazon", dir.path(), &DatasetOptions::default()).unwrap();
        assert_eq!(kb.name(), "amazon");
        assert_eq!(kb.title(1).unwrap(), "Camp Stove");
        assert_eq!(kb.graph().rel_type_lst(), vec!["also_buy", "also_view", "has_brand"]);
        assert!(kb.chunk_attributes().contains(&"reviews"));
        assert!(dir.path().join("amazon/processed/cache/brand").is_dir());
    }

    #[test]
    fn default_options_match_default_config() {
        let config = Config::default();
        let options = DatasetOptions::default();
        assert_eq!(options.categories, config.dataset.categories);
        assert_eq!(options.meta_link_types, config.dataset.meta_link_types);
        assert_eq!(options.max_entries, config.dataset.max_entries);
        assert_eq!(options.indirected, config.dataset.indirected);
    }

    #[test]
    fn unknown_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset("prime", dir.path(), &DatasetOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, KbError::UnknownDataset(name) if name == "prime"));
    }
}
