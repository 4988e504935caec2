//! Search execution for the stark index.
//!
//! Queries are parsed leniently over `title` and `body`, with the title boosted, and ranked
//! by BM25.

use std::path::Path;

use serde::Serialize;
use tantivy::{
    Index, IndexReader, ReloadPolicy, TantivyDocument, TantivyError,
    collector::TopDocs,
    directory::MmapDirectory,
    query::QueryParser,
    schema::{Field, Value},
};
use tracing::debug;

use crate::{
    IndexError,
    analyzer::{STARK_TOKENIZER, build_analyzer_from_name},
    schema::{IndexSchema, boost},
};

/// A ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    /// Knowledge base node id.
    pub node_id: u64,
    /// Node type name.
    pub node_type: String,
    /// Node label.
    pub title: String,
    /// BM25 score.
    pub score: f32,
}

/// Searches a built index.
pub struct Searcher {
    /// Reader over the committed index.
    reader: IndexReader,
    /// Schema with field handles.
    schema: IndexSchema,
    /// Parser over the searchable fields.
    query_parser: QueryParser,
}

impl Searcher {
    /// Opens an existing index, analyzing queries with the `stemmer` language.
    ///
    /// The stemmer must match the one the index was built with.
    pub fn open(path: &Path, stemmer: &str) -> Result<Self, IndexError> {
        if !path.exists() {
            return Err(IndexError::OpenIndex {
                path: path.to_path_buf(),
                message: "index directory does not exist; run `stark build`".to_string(),
            });
        }

        let schema = IndexSchema::new();
        let analyzer = build_analyzer_from_name(stemmer)?;

        let dir = MmapDirectory::open(path).map_err(|e| {
            let err: TantivyError = e.into();
            IndexError::open_index(path.to_path_buf(), &err)
        })?;
        let index = Index::open(dir).map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;
        index.tokenizers().register(STARK_TOKENIZER, analyzer);

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;

        let mut query_parser = QueryParser::for_index(&index, schema.search_fields());
        query_parser.set_field_boost(schema.title, boost::TITLE);
        query_parser.set_field_boost(schema.body, boost::BODY);

        Ok(Self {
            reader,
            schema,
            query_parser,
        })
    }

    /// Returns up to `limit` hits for `query`, best first.
    ///
    /// Blank queries and a zero limit return nothing. Query syntax errors are tolerated:
    /// the parsable part of the query is used.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<Hit>, IndexError> {
        if query.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let (parsed, errors) = self.query_parser.parse_query_lenient(query);
        if !errors.is_empty() {
            debug!(query, errors = ?errors, "query parsed leniently");
        }

        let searcher = self.reader.searcher();
        let top_docs = searcher
            .search(&parsed, &TopDocs::with_limit(limit))
            .map_err(|e| IndexError::search(&e))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| IndexError::search(&e))?;
            hits.push(Hit {
                node_id: doc
                    .get_first(self.schema.node_id)
                    .and_then(|v| v.as_u64())
                    .unwrap_or_default(),
                node_type: text_field(&doc, self.schema.node_type),
                title: text_field(&doc, self.schema.title),
                score,
            });
        }
        Ok(hits)
    }

    /// Returns the number of documents in the index.
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }
}

/// Extracts a stored text value from a document.
fn text_field(doc: &TantivyDocument, field: Field) -> String {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}
