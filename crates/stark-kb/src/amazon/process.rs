//! Raw dump processing.
//!
//! Joins the metadata, review and Q&A dumps of the selected categories into product nodes and
//! builds the product-to-product graph from the `also_buy` and `also_view` lists.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::Path,
};

use tracing::{debug, info};

use super::{
    categories::{CategorySelection, display_name},
    raw::{self, RawMeta, RawQa, RawReview},
};
use crate::{
    brand::{is_meaningful_brand, normalize_brand},
    error::KbError,
    graph::{EdgeIndex, ProcessedData},
    node::{NodeInfo, Product, QaEntry, Review},
    text::{clean_list, clean_text},
};

/// Node type name of products.
pub const PRODUCT_TYPE: &str = "product";

/// Product link columns, in edge type id order.
pub const LINK_COLUMNS: [&str; 2] = ["also_buy", "also_view"];

/// Reads the raw dumps under `raw_dir` and builds the product graph.
///
/// Products need a metadata row and at least one review. Node ids follow the order of the
/// first metadata row of each kept product.
pub fn process_raw(raw_dir: &Path, selection: &CategorySelection) -> Result<ProcessedData, KbError> {
    info!(
        review_categories = selection.review.len(),
        qa_categories = selection.qa.len(),
        "processing raw data"
    );

    let mut qa_rows: Vec<RawQa> = Vec::new();
    for category in &selection.qa {
        qa_rows.extend(raw::read_python_lines(&raw::qa_file(raw_dir, category))?);
    }
    let mut review_rows: Vec<RawReview> = Vec::new();
    let mut meta_rows: Vec<(String, RawMeta)> = Vec::new();
    for category in &selection.review {
        review_rows.extend(raw::read_json_lines(&raw::review_file(raw_dir, category))?);
        let global_category = display_name(category);
        let rows: Vec<RawMeta> = raw::read_json_lines(&raw::meta_file(raw_dir, category))?;
        meta_rows.extend(rows.into_iter().map(|row| (global_category.clone(), row)));
    }
    debug!(
        meta = meta_rows.len(),
        reviews = review_rows.len(),
        qa = qa_rows.len(),
        "read raw rows"
    );

    let reviewed: HashSet<&str> = review_rows.iter().map(|r| r.asin.as_str()).collect();
    let mut seen = HashSet::new();
    let kept: Vec<&(String, RawMeta)> = meta_rows
        .iter()
        .filter(|(_, meta)| seen.insert(meta.asin.as_str()))
        .filter(|(_, meta)| reviewed.contains(meta.asin.as_str()))
        .collect();
    let asin_to_id: HashMap<&str, usize> = kept
        .iter()
        .enumerate()
        .map(|(id, (_, meta))| (meta.asin.as_str(), id))
        .collect();

    let mut products: Vec<Product> = kept
        .iter()
        .map(|(global_category, meta)| product_from_meta(global_category, meta))
        .collect();
    for row in review_rows {
        if let Some(&id) = asin_to_id.get(row.asin.as_str()) {
            products[id].review.push(Review {
                reviewer_id: row.reviewer_id,
                summary: row.summary,
                review_text: row.review_text,
                vote: row.vote,
                overall: row.overall,
                verified: row.verified,
                review_time: row.review_time,
            });
        }
    }
    for row in qa_rows {
        if let Some(&id) = asin_to_id.get(row.asin.as_str()) {
            products[id].qa.push(QaEntry {
                question_type: row.question_type,
                answer_type: row.answer_type,
                question: row.question,
                answer: row.answer,
                answer_time: row.answer_time,
            });
        }
    }

    let mut edges = EdgeIndex::default();
    let mut edge_types = Vec::new();
    for (src, (_, meta)) in kept.iter().enumerate() {
        for (edge_type, linked) in [&meta.also_buy, &meta.also_view].into_iter().enumerate() {
            for dst in linked.iter().filter_map(|asin| asin_to_id.get(asin.as_str())) {
                edges.push(src, *dst);
                edge_types.push(edge_type);
            }
        }
    }

    info!(
        products = products.len(),
        edges = edges.len(),
        "built product graph"
    );
    let num_products = products.len();
    Ok(ProcessedData {
        nodes: products.into_iter().map(NodeInfo::Product).collect(),
        node_types: vec![0; num_products],
        node_type_dict: BTreeMap::from([(0, PRODUCT_TYPE.to_string())]),
        edges,
        edge_types,
        edge_type_dict: LINK_COLUMNS
            .iter()
            .enumerate()
            .map(|(id, name)| (id, (*name).to_string()))
            .collect(),
    })
}

/// Builds a product from its metadata row, cleaning every text column.
fn product_from_meta(global_category: &str, meta: &RawMeta) -> Product {
    let brand = normalize_brand(&clean_text(&meta.brand));
    Product {
        asin: meta.asin.clone(),
        title: clean_text(&meta.title),
        global_category: global_category.to_string(),
        category: clean_list(&meta.category),
        price: non_empty(clean_text(meta.price.as_deref().unwrap_or_default())),
        brand: is_meaningful_brand(&brand).then_some(brand),
        // Feature positions are shown to readers, so blank entries stay in place.
        feature: meta.feature.iter().map(|f| clean_text(f)).collect(),
        rank: non_empty(clean_text(meta.rank.as_deref().unwrap_or_default())),
        details: meta
            .details
            .iter()
            .map(|(k, v)| (k.clone(), clean_text(v)))
            .collect(),
        description: clean_list(&meta.description),
        review: Vec::new(),
        qa: Vec::new(),
    }
}

/// `None` for an empty string.
fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}
