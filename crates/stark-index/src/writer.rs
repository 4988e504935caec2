//! Index writer for adding node documents to the Tantivy index.

use std::{fs, path::Path};

use tantivy::{
    Index, IndexWriter as TantivyIndexWriter, TantivyDocument, TantivyError,
    directory::MmapDirectory,
};

use crate::{
    analyzer::{STARK_TOKENIZER, build_analyzer_from_name},
    document::NodeDocument,
    error::IndexError,
    schema::IndexSchema,
};

/// Default heap size for the index writer (50 MB).
const DEFAULT_HEAP_SIZE: usize = 50_000_000;

/// Writes node documents to a Tantivy index.
pub struct IndexWriter {
    /// The Tantivy index.
    index: Index,
    /// The underlying Tantivy writer.
    writer: TantivyIndexWriter,
    /// Schema with field handles.
    schema: IndexSchema,
}

impl IndexWriter {
    /// Opens or creates an index at `path`, analyzing text with the `stemmer` language.
    pub fn open(path: &Path, stemmer: &str) -> Result<Self, IndexError> {
        let schema = IndexSchema::new();
        let analyzer = build_analyzer_from_name(stemmer)?;

        fs::create_dir_all(path)?;

        let dir = MmapDirectory::open(path).map_err(|e| {
            let err: TantivyError = e.into();
            IndexError::open_index(path.to_path_buf(), &err)
        })?;

        let index = Index::open_or_create(dir, schema.schema().clone())
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;
        index.tokenizers().register(STARK_TOKENIZER, analyzer);

        let writer = index
            .writer(DEFAULT_HEAP_SIZE)
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;

        Ok(Self {
            index,
            writer,
            schema,
        })
    }

    /// Stages a node document; it becomes visible after [`IndexWriter::commit`].
    pub fn add_node(&mut self, doc: &NodeDocument) -> Result<(), IndexError> {
        let mut tantivy_doc = TantivyDocument::new();
        tantivy_doc.add_u64(self.schema.node_id, doc.node_id);
        tantivy_doc.add_text(self.schema.node_type, &doc.node_type);
        tantivy_doc.add_text(self.schema.title, &doc.title);
        tantivy_doc.add_text(self.schema.body, &doc.body);

        self.writer
            .add_document(tantivy_doc)
            .map_err(|e| IndexError::write(&e))?;
        Ok(())
    }

    /// Commits all pending changes to the index.
    pub fn commit(&mut self) -> Result<(), IndexError> {
        self.writer.commit().map_err(|e| IndexError::commit(&e))?;
        Ok(())
    }

    /// Rolls back any uncommitted changes.
    pub fn rollback(&mut self) -> Result<(), IndexError> {
        self.writer.rollback().map_err(|e| IndexError::commit(&e))?;
        Ok(())
    }

    /// Deletes all documents from the index.
    pub fn delete_all(&mut self) -> Result<(), IndexError> {
        self.writer
            .delete_all_documents()
            .map_err(|e| IndexError::write(&e))?;
        Ok(())
    }

    /// Returns the number of committed documents.
    pub fn num_docs(&self) -> Result<u64, IndexError> {
        let reader = self.index.reader().map_err(|e| IndexError::search(&e))?;
        Ok(reader.searcher().num_docs())
    }
}
