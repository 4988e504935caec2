//! The Amazon product knowledge base.
//!
//! Products from the UCSD review, metadata and Q&A dumps become nodes; `also_buy` and
//! `also_view` lists become product relations; meta links add entity nodes for shared
//! attribute values.
//!
//! On disk, a dataset root holds:
//!
//! ```text
//! <root>/raw/                         gzip dumps, as downloaded
//! <root>/processed/                   product graph built from the dumps
//! <root>/processed/cache/<t1-t2>/     product graph with meta links t1, t2
//! ```

pub mod categories;
pub mod download;
#[cfg(test)]
pub mod fixtures;
pub mod meta_links;
pub mod process;
pub mod raw;
pub mod render;

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::info;

use self::{
    categories::resolve_categories,
    download::fetch_raw,
    meta_links::{add_meta_links, normalize_link_types},
    process::{PRODUCT_TYPE, process_raw},
    render::{CHUNK_ATTRIBUTES, DocRenderer},
};
use crate::{
    error::KbError,
    graph::SemiStructKb,
    registry::{DatasetOptions, KnowledgeBase},
    store,
};

/// Node types eligible as retrieval answers.
pub const CANDIDATE_TYPES: [&str; 1] = [PRODUCT_TYPE];

/// Layout of an Amazon dataset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmazonPaths {
    /// Dataset root.
    pub root: PathBuf,
}

impl AmazonPaths {
    /// Layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory of the raw dumps.
    pub fn raw_dir(&self) -> PathBuf {
        self.root.join("raw")
    }

    /// Directory of the product graph.
    pub fn processed_dir(&self) -> PathBuf {
        self.root.join("processed")
    }

    /// Directory of the graph with the given meta links, or `None` without meta links.
    pub fn cache_dir<S: AsRef<str>>(&self, link_types: &[S]) -> Option<PathBuf> {
        if link_types.is_empty() {
            return None;
        }
        let key: Vec<&str> = link_types.iter().map(|t| t.as_ref()).collect();
        Some(self.processed_dir().join("cache").join(key.join("-")))
    }
}

/// The Amazon knowledge base: a product graph plus its renderer settings.
#[derive(Debug, Clone)]
pub struct AmazonKb {
    /// The graph.
    kb: SemiStructKb,
    /// Maximum reviews and Q&A entries per document.
    max_entries: usize,
}

impl AmazonKb {
    /// Loads the knowledge base rooted at `root`, building whatever is missing.
    ///
    /// A meta-link cache is used as is. Otherwise the product graph is read from
    /// `processed/`, or built from the raw dumps (downloading them first when a download
    /// source is set) and saved there; meta links are then added and cached.
    pub fn load(root: &Path, options: &DatasetOptions) -> Result<Self, KbError> {
        let paths = AmazonPaths::new(root);
        let selection = resolve_categories(&options.categories)?;
        let link_types = normalize_link_types(&options.meta_link_types)?;

        if options.force && paths.processed_dir().exists() {
            info!(dir = %paths.processed_dir().display(), "removing processed data");
            fs::remove_dir_all(paths.processed_dir())
                .map_err(|e| KbError::io(paths.processed_dir(), e))?;
        }
        for dir in [paths.raw_dir(), paths.processed_dir()] {
            fs::create_dir_all(&dir).map_err(|e| KbError::io(&dir, e))?;
        }

        let cache_dir = paths.cache_dir(&link_types);
        let data = match &cache_dir {
            Some(cache) if store::exists(cache) => {
                info!(link_types = %link_types.join(","), "loading cached graph");
                store::load(cache)?
            }
            _ => {
                let processed_dir = paths.processed_dir();
                let base = if store::exists(&processed_dir) {
                    info!(dir = %processed_dir.display(), "loading processed data");
                    store::load(&processed_dir)?
                } else {
                    if let Some(source) = &options.download {
                        fetch_raw(source, &selection, &paths.raw_dir())?;
                    }
                    let data = process_raw(&paths.raw_dir(), &selection)?;
                    store::save(&processed_dir, &data)?;
                    data
                };
                match &cache_dir {
                    Some(cache) => {
                        let linked = add_meta_links(base, &link_types)?;
                        store::save(cache, &linked)?;
                        linked
                    }
                    None => base,
                }
            }
        };

        let kb = SemiStructKb::new(data, options.indirected)?
            .with_candidate_types(&CANDIDATE_TYPES);
        Ok(Self {
            kb,
            max_entries: options.max_entries,
        })
    }

    /// Wraps an existing graph.
    pub fn from_graph(kb: SemiStructKb, max_entries: usize) -> Self {
        Self {
            kb: kb.with_candidate_types(&CANDIDATE_TYPES),
            max_entries,
        }
    }

    /// Renderer for this knowledge base.
    pub fn renderer(&self) -> DocRenderer<'_> {
        DocRenderer::new(&self.kb, self.max_entries)
    }
}

impl KnowledgeBase for AmazonKb {
    fn name(&self) -> &'static str {
        "amazon"
    }

    fn graph(&self) -> &SemiStructKb {
        &self.kb
    }

    fn doc_info(&self, id: usize, add_rel: bool, compact: bool) -> Result<String, KbError> {
        self.renderer().doc_info(id, add_rel, compact)
    }

    fn rel_info(&self, id: usize) -> Result<String, KbError> {
        self.renderer().rel_info(id)
    }

    fn chunk_info(&self, id: usize, attribute: &str) -> Result<String, KbError> {
        self.renderer().chunk_info(id, attribute)
    }

    fn chunk_attributes(&self) -> &'static [&'static str] {
        &CHUNK_ATTRIBUTES
    }
}

#[cfg(test)]
mod tests {
    use super::{fixtures::write_sample_raw, *};

    /// Options for the sample dumps.
    fn options(link_types: &[&str]) -> DatasetOptions {
        DatasetOptions {
            categories: vec![fixtures::CATEGORY.into()],
            meta_link_types: link_types.iter().map(|t| (*t).to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn builds_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AmazonPaths::new(dir.path());
        write_sample_raw(&paths.raw_dir());

        let kb = AmazonKb::load(dir.path(), &options(&["brand"])).unwrap();
        assert_eq!(kb.graph().num_nodes(), 4);
        assert_eq!(kb.graph().candidate_ids(), vec![0, 1, 2]);
        assert!(store::exists(&paths.processed_dir()));
        let cache = paths.cache_dir(&["brand"]).unwrap();
        assert!(store::exists(&cache));
        assert!(cache.ends_with("processed/cache/brand"));

        // With the raw dumps gone, the cache alone must be enough.
        fs::remove_dir_all(paths.raw_dir()).unwrap();
        let again = AmazonKb::load(dir.path(), &options(&["brand"])).unwrap();
        assert_eq!(again.graph().data(), kb.graph().data());
    }

    #[test]
    fn processed_data_reused_for_new_link_types() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AmazonPaths::new(dir.path());
        write_sample_raw(&paths.raw_dir());
        AmazonKb::load(dir.path(), &options(&[])).unwrap();
        assert!(paths.cache_dir::<&str>(&[]).is_none());
        fs::remove_dir_all(paths.raw_dir()).unwrap();

        let kb = AmazonKb::load(dir.path(), &options(&["brand", "category"])).unwrap();
        assert_eq!(kb.graph().node_type_lst(), vec!["product", "brand", "category"]);
        assert!(store::exists(&paths.processed_dir().join("cache/brand-category")));
    }

    #[test]
    fn force_rebuilds_from_raw() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AmazonPaths::new(dir.path());
        write_sample_raw(&paths.raw_dir());
        AmazonKb::load(dir.path(), &options(&["brand"])).unwrap();
        fs::remove_dir_all(paths.raw_dir()).unwrap();

        let forced = DatasetOptions {
            force: true,
            ..options(&["brand"])
        };
        let err = AmazonKb::load(dir.path(), &forced).unwrap_err();
        assert!(matches!(err, KbError::MissingRawFile { .. }));
    }

    #[test]
    fn missing_raw_data_without_download() {
        let dir = tempfile::tempdir().unwrap();
        let err = AmazonKb::load(dir.path(), &options(&["brand"])).unwrap_err();
        assert!(matches!(err, KbError::MissingRawFile { .. }));
    }

    #[test]
    fn invalid_options_fail_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let bad_category = DatasetOptions {
            categories: vec!["Books".into()],
            ..Default::default()
        };
        assert!(matches!(
            AmazonKb::load(dir.path(), &bad_category),
            Err(KbError::InvalidCategories { .. })
        ));
        assert!(matches!(
            AmazonKb::load(dir.path(), &options(&["color"])),
            Err(KbError::UnsupportedMetaLink(_))
        ));
    }

    #[test]
    fn directed_graph_option() {
        let dir = tempfile::tempdir().unwrap();
        write_sample_raw(&AmazonPaths::new(dir.path()).raw_dir());
        let kb = AmazonKb::load(
            dir.path(),
            &DatasetOptions {
                indirected: false,
                ..options(&["brand"])
            },
        )
        .unwrap();
        assert!(!kb.graph().is_indirected());
        assert!(!kb.renderer().has_also_buy(1, 0));
        assert!(kb.renderer().has_also_buy(0, 1));
    }
}
