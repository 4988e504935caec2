//! Index schema for knowledge base nodes.
//!
//! One Tantivy document per candidate node:
//! - `node_id`: knowledge base node id (u64, indexed, stored, fast)
//! - `node_type`: node type name (string, stored)
//! - `title`: node label (text, stored, boosted 3.0x)
//! - `body`: compact document text with relations (text, stored)

use tantivy::schema::{
    FAST, Field, INDEXED, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing,
    TextOptions,
};

use crate::analyzer::STARK_TOKENIZER;

/// Field boost weights for search ranking.
pub mod boost {
    /// Title field boost (3.0x).
    pub const TITLE: f32 = 3.0;
    /// Body field boost (1.0x).
    pub const BODY: f32 = 1.0;
}

/// Handles to all fields in the index schema.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    /// The underlying Tantivy schema.
    schema: Schema,
    /// Knowledge base node id.
    pub node_id: Field,
    /// Node type name.
    pub node_type: Field,
    /// Node label.
    pub title: Field,
    /// Rendered document text.
    pub body: Field,
}

impl IndexSchema {
    /// Creates the schema with all fields configured.
    pub fn new() -> Self {
        let mut builder = Schema::builder();

        let node_id = builder.add_u64_field("node_id", INDEXED | STORED | FAST);
        let node_type = builder.add_text_field("node_type", STRING | STORED);
        let title = builder.add_text_field("title", analyzed_text());
        let body = builder.add_text_field("body", analyzed_text());

        Self {
            schema: builder.build(),
            node_id,
            node_type,
            title,
            body,
        }
    }

    /// Returns a reference to the underlying Tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Fields searched by free-text queries.
    pub fn search_fields(&self) -> Vec<Field> {
        vec![self.title, self.body]
    }
}

impl Default for IndexSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Stored text analyzed with the stark tokenizer, keeping positions for phrase queries.
fn analyzed_text() -> TextOptions {
    TextOptions::default()
        .set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(STARK_TOKENIZER)
                .set_index_option(IndexRecordOption::WithFreqsAndPositions),
        )
        .set_stored()
}

#[cfg(test)]
mod tests {
    use tantivy::schema::FieldType;

    use super::*;

    #[test]
    fn fields_are_registered_by_name() {
        let schema = IndexSchema::new();
        let inner = schema.schema();
        for (name, field) in [
            ("node_id", schema.node_id),
            ("node_type", schema.node_type),
            ("title", schema.title),
            ("body", schema.body),
        ] {
            assert_eq!(inner.get_field(name).unwrap(), field);
        }
    }

    #[test]
    fn node_id_is_fast_and_stored() {
        let schema = IndexSchema::new();
        let entry = schema.schema().get_field_entry(schema.node_id);
        assert!(entry.is_fast());
        assert!(entry.is_stored());
        assert!(entry.is_indexed());
    }

    #[test]
    fn text_fields_use_stark_tokenizer() {
        let schema = IndexSchema::new();
        for field in schema.search_fields() {
            let entry = schema.schema().get_field_entry(field);
            let FieldType::Str(options) = entry.field_type() else {
                panic!("expected a text field");
            };
            let indexing = options.get_indexing_options().unwrap();
            assert_eq!(indexing.tokenizer(), STARK_TOKENIZER);
        }
    }

    #[test]
    fn title_outweighs_body() {
        assert!(boost::TITLE > boost::BODY);
    }
}
