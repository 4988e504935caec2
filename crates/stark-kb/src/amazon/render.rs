//! Text renderings of Amazon nodes.
//!
//! Documents are the retrieval view of a node: a product's title, brand, dimensions,
//! description, features, most-voted reviews and Q&A, optionally followed by its relations.
//! Chunks render a single attribute as prose for attribute-level retrieval.

use super::process::LINK_COLUMNS;
use crate::{
    brand::brands_match,
    error::KbError,
    graph::SemiStructKb,
    node::{Entity, NodeInfo, Product},
    text::compact_text,
};

/// Attributes accepted by [`DocRenderer::chunk_info`].
pub const CHUNK_ATTRIBUTES: [&str; 8] = [
    "title",
    "brand",
    "dimensions",
    "weight",
    "description",
    "features",
    "reviews",
    "qa",
];

/// Renders documents, relation summaries and chunks for the nodes of a graph.
#[derive(Debug, Clone, Copy)]
pub struct DocRenderer<'a> {
    /// Graph whose nodes are rendered.
    kb: &'a SemiStructKb,
    /// Maximum number of reviews and of Q&A entries per document.
    max_entries: usize,
}

impl<'a> DocRenderer<'a> {
    /// Creates a renderer.
    pub fn new(kb: &'a SemiStructKb, max_entries: usize) -> Self {
        Self { kb, max_entries }
    }

    /// Full document for a node.
    ///
    /// With `add_rel` the relation summary is appended; `compact` flattens the result onto one
    /// line.
    pub fn doc_info(&self, id: usize, add_rel: bool, compact: bool) -> Result<String, KbError> {
        let mut doc = match self.kb.node(id)? {
            NodeInfo::Entity(entity) => return Ok(entity_doc(entity)),
            NodeInfo::Product(product) => self.product_doc(product),
        };
        if add_rel {
            doc.push_str(&self.rel_info(id)?);
        }
        if compact {
            doc = compact_text(&doc);
        }
        Ok(doc)
    }

    /// Relation summary for a node, or an empty string when it has no relations.
    pub fn rel_info(&self, id: usize) -> Result<String, KbError> {
        let body = match self.kb.node(id)? {
            NodeInfo::Product(_) => self.product_relations(id),
            NodeInfo::Entity(entity) => self.entity_relations(id, entity),
        };
        if body.is_empty() {
            Ok(body)
        } else {
            Ok(format!("- relations:\n{body}"))
        }
    }

    /// Prose rendering of one attribute of a product.
    ///
    /// Entity nodes and unknown attributes render as an empty string.
    pub fn chunk_info(&self, id: usize, attribute: &str) -> Result<String, KbError> {
        let Some(product) = self.kb.node(id)?.as_product() else {
            return Ok(String::new());
        };
        let chunk = match attribute {
            "title" => product.title.clone(),
            "brand" => product.brand.clone().unwrap_or_default(),
            "dimensions" => product
                .dimensions_and_weight()
                .map(|(d, _)| d.to_string())
                .unwrap_or_default(),
            "weight" => product
                .dimensions_and_weight()
                .map(|(_, w)| w.to_string())
                .unwrap_or_default(),
            "description" => product.description.join(" "),
            "features" => product
                .visible_features()
                .map(|(_, f)| f)
                .collect::<Vec<_>>()
                .join(" "),
            "reviews" => {
                let mut chunk = String::new();
                for (_, review) in product.reviews_by_votes().into_iter().take(self.max_entries) {
                    chunk.push_str(&format!(
                        "The review \"{}\" states that \"{}\". ",
                        review.summary, review.review_text
                    ));
                }
                chunk
            }
            "qa" => {
                let mut chunk = String::new();
                for qa in product.qa.iter().take(self.max_entries) {
                    chunk.push_str(&format!(
                        "The question is \"{}\", and the answer is \"{}\". ",
                        qa.question, qa.answer
                    ));
                }
                chunk
            }
            _ => String::new(),
        };
        Ok(chunk)
    }

    /// Whether a product's brand matches `brand`. Never errors.
    pub fn has_brand(&self, id: usize, brand: &str) -> bool {
        self.kb
            .node(id)
            .ok()
            .and_then(NodeInfo::as_product)
            .and_then(|p| p.brand.as_deref())
            .is_some_and(|b| brands_match(b, brand))
    }

    /// Whether `other` is an also-bought neighbor of `id`. Never errors.
    pub fn has_also_buy(&self, id: usize, other: usize) -> bool {
        self.neighbors(id, LINK_COLUMNS[0]).contains(&other)
    }

    /// Whether `other` is an also-viewed neighbor of `id`. Never errors.
    pub fn has_also_view(&self, id: usize, other: usize) -> bool {
        self.neighbors(id, LINK_COLUMNS[1]).contains(&other)
    }

    /// Neighbors through a relation, empty when the relation is absent from the graph.
    fn neighbors(&self, id: usize, rel: &str) -> Vec<usize> {
        self.kb.neighbor_nodes(id, rel).unwrap_or_default()
    }

    /// Title of a node for relation listings.
    fn label(&self, id: usize) -> &str {
        self.kb.node(id).map_or("", NodeInfo::label)
    }

    /// Document body of a product, without relations.
    fn product_doc(&self, product: &Product) -> String {
        let mut doc = format!("- product: {}\n", product.title);
        if let Some(brand) = &product.brand {
            doc.push_str(&format!("- brand: {brand}\n"));
        }
        if let Some((dimensions, weight)) = product.dimensions_and_weight() {
            doc.push_str(&format!("- dimensions: {dimensions}\n- weight: {weight}\n"));
        }
        let description = product.description_text();
        if !description.is_empty() {
            doc.push_str(&format!("- description: {description}\n"));
        }

        if !product.feature.is_empty() {
            doc.push_str("- features: \n");
            for (position, feature) in product.visible_features() {
                doc.push_str(&format!("#{position}: {feature}\n"));
            }
        }

        if !product.review.is_empty() {
            doc.push_str("- reviews: \n");
            for (index, review) in product.reviews_by_votes().into_iter().take(self.max_entries) {
                doc.push_str(&format!(
                    "#{}:\nsummary: {}\ntext: \"{}\"\n",
                    index + 1,
                    review.summary,
                    review.review_text
                ));
            }
        }

        if !product.qa.is_empty() {
            doc.push_str("- Q&A: \n");
            for (index, qa) in product.qa.iter().enumerate().take(self.max_entries) {
                doc.push_str(&format!(
                    "#{}:\nquestion: \"{}\"\nanswer: \"{}\"\n",
                    index + 1,
                    qa.question,
                    qa.answer
                ));
            }
        }
        doc
    }

    /// Relation lines of a product.
    fn product_relations(&self, id: usize) -> String {
        let mut body = String::new();
        for (rel, heading) in [
            (LINK_COLUMNS[0], "products also purchased"),
            (LINK_COLUMNS[1], "products also viewed"),
        ] {
            let neighbors = self.neighbors(id, rel);
            if neighbors.is_empty() {
                continue;
            }
            body.push_str(&format!("  {heading}: \n"));
            for (k, neighbor) in neighbors.iter().enumerate() {
                body.push_str(&format!("#{}: {}\n", k + 1, self.label(*neighbor)));
            }
        }
        if let Some(&brand) = self.neighbors(id, "has_brand").first() {
            body.push_str(&format!("  brand: {}\n", self.label(brand)));
        }
        let categories: Vec<&str> = self
            .neighbors(id, "has_category")
            .into_iter()
            .map(|n| self.label(n))
            .collect();
        if !categories.is_empty() {
            body.push_str(&format!("  categories: {}\n", categories.join("; ")));
        }
        body
    }

    /// Relation lines of an entity: the products that link to it.
    fn entity_relations(&self, id: usize, entity: &Entity) -> String {
        let products = self.neighbors(id, &format!("has_{}", entity.kind));
        if products.is_empty() {
            return String::new();
        }
        let mut body = String::from("  linked products: \n");
        for (k, product) in products.iter().enumerate() {
            body.push_str(&format!("#{}: {}\n", k + 1, self.label(*product)));
        }
        body
    }
}

/// Document of an entity node.
fn entity_doc(entity: &Entity) -> String {
    format!("{} name: {}", entity.kind, entity.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        amazon::{
            categories::resolve_categories,
            fixtures::{CATEGORY, write_sample_raw},
            meta_links::add_meta_links,
            process::process_raw,
        },
        graph::tests::sample_data,
        node::{QaEntry, Review},
    };

    /// The sample dumps processed with brand links.
    fn sample_kb(indirected: bool) -> SemiStructKb {
        let dir = tempfile::tempdir().unwrap();
        write_sample_raw(dir.path());
        let data = process_raw(dir.path(), &resolve_categories(&[CATEGORY]).unwrap()).unwrap();
        let data = add_meta_links(data, &["brand"]).unwrap();
        SemiStructKb::new(data, indirected).unwrap()
    }

    #[test]
    fn product_document_layout() {
        let kb = sample_kb(true);
        let doc = DocRenderer::new(&kb, 25).doc_info(0, false, false).unwrap();
        let expected = "- product: Dome & Tunnel Tent\n\
                        - brand: Coleman\n\
                        - dimensions: 84 x 60 x 48 inches\n\
                        - weight: 9.5 pounds\n\
                        - description: Roomy tent. Sets up in minutes.\n\
                        - features: \n\
                        #1: Sleeps 4\n\
                        #4: Waterproof fly\n\
                        - reviews: \n\
                        #2:\nsummary: Great\ntext: \"Stayed dry in a storm.\"\n\
                        #3:\nsummary: Leaky\ntext: \"Seams leaked.\"\n\
                        #1:\nsummary: Okay\ntext: \"Fine tent.\"\n\
                        - Q&A: \n\
                        #1:\nquestion: \"Does it fit a queen mattress?\"\nanswer: \"Yes, easily.\"\n\
                        #2:\nquestion: \"What's the pole material?\"\nanswer: \"Fiberglass.\"\n";
        assert_eq!(doc, expected);
    }

    #[test]
    fn relations_follow_document() {
        let kb = sample_kb(true);
        let doc = DocRenderer::new(&kb, 25).doc_info(0, true, false).unwrap();
        assert!(doc.ends_with(
            "- relations:\n  products also purchased: \n#1: Camp Stove\n  \
             products also viewed: \n#1: Camp Stove\n#2: LED Lantern\n  brand: Coleman\n"
        ));
    }

    #[test]
    fn compact_document_is_one_line() {
        let kb = sample_kb(true);
        let doc = DocRenderer::new(&kb, 25).doc_info(1, true, true).unwrap();
        assert!(!doc.contains('\n'));
        assert!(doc.starts_with("- product: Camp Stove - brand: Coleman - features: #1: Two burners"));
    }

    #[test]
    fn entries_are_capped() {
        let kb = sample_kb(true);
        let renderer = DocRenderer::new(&kb, 1);
        let doc = renderer.doc_info(0, false, false).unwrap();
        assert!(doc.contains("summary: Great"));
        assert!(!doc.contains("summary: Leaky"));
        assert!(!doc.contains("pole material"));
        assert_eq!(
            renderer.chunk_info(0, "reviews").unwrap(),
            "The review \"Great\" states that \"Stayed dry in a storm.\". "
        );
    }

    /// The hand-built graph with `count` reviews and questions on the tent, most voted first.
    fn busy_kb(count: usize) -> SemiStructKb {
        let mut data = sample_data();
        if let NodeInfo::Product(p) = &mut data.nodes[0] {
            p.review = (0..count)
                .map(|i| Review {
                    summary: format!("r{i}"),
                    review_text: "text".into(),
                    vote: Some((count - i).to_string()),
                    ..Default::default()
                })
                .collect();
            p.qa = (0..count)
                .map(|i| QaEntry {
                    question: format!("q{i}"),
                    answer: "a".into(),
                    ..Default::default()
                })
                .collect();
        }
        SemiStructKb::new(data, true).unwrap()
    }

    #[test]
    fn exactly_max_entries_are_rendered() {
        let kb = busy_kb(5);
        let renderer = DocRenderer::new(&kb, 2);
        let doc = renderer.doc_info(0, false, false).unwrap();
        assert_eq!(doc.matches("summary: ").count(), 2);
        assert_eq!(doc.matches("question: ").count(), 2);
        assert!(doc.contains("#1:\nsummary: r0\n"));
        assert!(doc.contains("#2:\nsummary: r1\n"));
        assert!(doc.contains("#2:\nquestion: \"q1\"\n"));
        assert!(!doc.contains("r2") && !doc.contains("q2"));

        assert_eq!(renderer.chunk_info(0, "reviews").unwrap().matches("The review").count(), 2);
        assert_eq!(renderer.chunk_info(0, "qa").unwrap().matches("The question").count(), 2);
    }

    #[test]
    fn zero_max_entries_keeps_only_headers() {
        let kb = busy_kb(3);
        let renderer = DocRenderer::new(&kb, 0);
        let doc = renderer.doc_info(0, false, false).unwrap();
        assert!(doc.contains("- reviews: \n- Q&A: \n"));
        assert!(!doc.contains("summary: "));
        assert!(!doc.contains("question: "));
        assert_eq!(renderer.chunk_info(0, "reviews").unwrap(), "");
        assert_eq!(renderer.chunk_info(0, "qa").unwrap(), "");
    }

    #[test]
    fn entity_document_and_relations() {
        let kb = sample_kb(true);
        let renderer = DocRenderer::new(&kb, 25);
        let brand_id = kb.node_ids_by_type("brand")[0];
        assert_eq!(
            renderer.doc_info(brand_id, true, false).unwrap(),
            "brand name: Coleman"
        );
        assert_eq!(
            renderer.rel_info(brand_id).unwrap(),
            "- relations:\n  linked products: \n#1: Dome & Tunnel Tent\n#2: Camp Stove\n"
        );
    }

    #[test]
    fn product_without_relations_has_empty_rel_info() {
        let kb = sample_kb(false);
        let renderer = DocRenderer::new(&kb, 25);
        // The lantern only appears as a destination.
        assert_eq!(renderer.rel_info(2).unwrap(), "");
    }

    #[test]
    fn chunks_per_attribute() {
        let kb = sample_kb(true);
        let renderer = DocRenderer::new(&kb, 25);
        assert_eq!(renderer.chunk_info(0, "features").unwrap(), "Sleeps 4 Waterproof fly");
        assert_eq!(renderer.chunk_info(0, "weight").unwrap(), "9.5 pounds");
        assert_eq!(renderer.chunk_info(0, "dimensions").unwrap(), "84 x 60 x 48 inches");
        assert_eq!(renderer.chunk_info(0, "brand").unwrap(), "Coleman");
        assert_eq!(
            renderer.chunk_info(0, "description").unwrap(),
            "Roomy tent. Sets up in minutes."
        );
        assert!(
            renderer
                .chunk_info(0, "qa")
                .unwrap()
                .starts_with("The question is \"Does it fit a queen mattress?\", and the answer is \"Yes, easily.\". ")
        );
        assert_eq!(renderer.chunk_info(0, "color").unwrap(), "");
        assert_eq!(renderer.chunk_info(3, "title").unwrap(), "");
        assert!(renderer.chunk_info(99, "title").is_err());
    }

    #[test]
    fn predicates_never_error() {
        let kb = sample_kb(true);
        let renderer = DocRenderer::new(&kb, 25);
        assert!(renderer.has_brand(0, "coleman.com"));
        assert!(!renderer.has_brand(2, "X"));
        assert!(!renderer.has_brand(99, "Coleman"));
        assert!(renderer.has_also_buy(0, 1));
        assert!(renderer.has_also_buy(1, 0));
        assert!(renderer.has_also_view(2, 0));
        assert!(!renderer.has_also_view(99, 0));
    }

    #[test]
    fn category_links_render_in_relations() {
        let dir = tempfile::tempdir().unwrap();
        write_sample_raw(dir.path());
        let data = process_raw(dir.path(), &resolve_categories(&[CATEGORY]).unwrap()).unwrap();
        let data = add_meta_links(data, &["category"]).unwrap();
        let kb = SemiStructKb::new(data, true).unwrap();
        let rel = DocRenderer::new(&kb, 25).rel_info(0).unwrap();
        assert!(rel.ends_with("  categories: Camping; Sports & Outdoors\n"));
    }

    #[test]
    fn renders_hand_built_graph() {
        let mut data = sample_data();
        if let NodeInfo::Product(p) = &mut data.nodes[0] {
            p.review = vec![Review {
                summary: "Roomy".into(),
                review_text: "Fits four.".into(),
                ..Default::default()
            }];
            p.qa = vec![QaEntry {
                question: "Stakes included?".into(),
                answer: "Yes".into(),
                ..Default::default()
            }];
        }
        let kb = SemiStructKb::new(data, true).unwrap();
        let doc = DocRenderer::new(&kb, 25).doc_info(0, true, false).unwrap();
        assert!(doc.starts_with("- product: tent\n- reviews: \n#1:\nsummary: Roomy"));
        assert!(doc.contains("- Q&A: \n#1:\nquestion: \"Stakes included?\"\nanswer: \"Yes\"\n"));
        assert!(doc.ends_with("  brand: Coleman\n"));
    }
}
