//! Meta links: entity nodes derived from product attributes.
//!
//! Each link type turns the distinct values of one product attribute into entity nodes and
//! links every product to the entities of its values. Entity nodes are appended after the
//! existing nodes in ascending value order, so ids are stable for a given input.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::{
    brand::normalize_brand,
    error::KbError,
    graph::ProcessedData,
    node::{Entity, NodeInfo, Product},
};

/// Link types that can be added to the product graph.
pub const SUPPORTED_META_LINKS: [&str; 2] = ["brand", "category"];

/// Relation name for a link type.
pub fn relation_name(link_type: &str) -> String {
    format!("has_{link_type}")
}

/// Removes repeated link types, keeping first occurrences, and rejects unsupported ones.
pub fn normalize_link_types<S: AsRef<str>>(link_types: &[S]) -> Result<Vec<String>, KbError> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for link_type in link_types {
        let link_type = link_type.as_ref();
        if !SUPPORTED_META_LINKS.contains(&link_type) {
            return Err(KbError::UnsupportedMetaLink(link_type.to_string()));
        }
        if seen.insert(link_type) {
            out.push(link_type.to_string());
        }
    }
    Ok(out)
}

/// Values of one link type on a product.
///
/// Stored brands are normalized again, so values left with a second `by ` or `.com` collapse
/// into one entity.
fn link_values(product: &Product, link_type: &str) -> Vec<String> {
    match link_type {
        "brand" => product.brand.iter().map(|b| normalize_brand(b)).collect(),
        "category" => {
            let unique: BTreeSet<&String> = product.category.iter().collect();
            unique.into_iter().cloned().collect()
        }
        _ => Vec::new(),
    }
}

/// Adds entity nodes and `has_<type>` edges for each link type, in list order.
///
/// The `i`-th link type gets node type id `n_node_types + i` and relation id
/// `n_edge_types + i`, counted from the dicts of the input data.
pub fn add_meta_links<S: AsRef<str>>(
    mut data: ProcessedData,
    link_types: &[S],
) -> Result<ProcessedData, KbError> {
    let link_types = normalize_link_types(link_types)?;
    let base_node_types = data.node_type_dict.len();
    let base_edge_types = data.edge_type_dict.len();

    for (i, link_type) in link_types.iter().enumerate() {
        let node_type = base_node_types + i;
        let edge_type = base_edge_types + i;
        data.node_type_dict.insert(node_type, link_type.clone());
        data.edge_type_dict.insert(edge_type, relation_name(link_type));

        let mut linked: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (id, node) in data.nodes.iter().enumerate() {
            let Some(product) = node.as_product() else {
                continue;
            };
            for value in link_values(product, link_type) {
                linked.entry(value).or_default().push(id);
            }
        }

        let first_entity = data.nodes.len();
        for (offset, (name, products)) in linked.into_iter().enumerate() {
            let entity = first_entity + offset;
            for product in products {
                data.edges.push(product, entity);
                data.edge_types.push(edge_type);
            }
            data.nodes.push(NodeInfo::Entity(Entity {
                kind: link_type.clone(),
                name,
            }));
            data.node_types.push(node_type);
        }
        info!(
            link_type = %link_type,
            entities = data.nodes.len() - first_entity,
            "added meta links"
        );
    }
    Ok(data)
}
