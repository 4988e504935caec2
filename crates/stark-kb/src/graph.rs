//! The semi-structured knowledge base graph.
//!
//! Nodes are dense `usize` ids into an attribute table. Edges are stored once as parallel
//! `src`/`dst`/`edge_types` vectors; the per-relation adjacency built at construction time is
//! what answers neighbor queries, and is symmetric when the graph is indirected.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::{error::KbError, node::NodeInfo};

/// Parallel source and destination vectors of the stored edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeIndex {
    /// Source node of each edge.
    pub src: Vec<usize>,
    /// Destination node of each edge.
    pub dst: Vec<usize>,
}

impl EdgeIndex {
    /// Number of stored edges.
    pub fn len(&self) -> usize {
        self.src.len()
    }

    /// Whether no edges are stored.
    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    /// Appends an edge.
    pub fn push(&mut self, src: usize, dst: usize) {
        self.src.push(src);
        self.dst.push(dst);
    }
}

/// The raw tables a knowledge base is built from, as produced by processing and persisted by
/// the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedData {
    /// Node attributes indexed by node id.
    pub nodes: Vec<NodeInfo>,
    /// Type id of each node.
    pub node_types: Vec<usize>,
    /// Node type names by id.
    pub node_type_dict: BTreeMap<usize, String>,
    /// Stored edges.
    pub edges: EdgeIndex,
    /// Relation type id of each edge.
    pub edge_types: Vec<usize>,
    /// Relation names by id.
    pub edge_type_dict: BTreeMap<usize, String>,
}

/// A typed, attributed graph.
#[derive(Debug, Clone)]
pub struct SemiStructKb {
    /// The validated tables.
    data: ProcessedData,
    /// Whether edges are traversable in both directions.
    indirected: bool,
    /// Node type names that are retrieval candidates.
    candidate_types: Vec<String>,
    /// Per relation id, neighbor lists keyed by node id.
    adjacency: HashMap<usize, HashMap<usize, Vec<usize>>>,
}

impl SemiStructKb {
    /// Validates the tables and builds the per-relation adjacency.
    pub fn new(data: ProcessedData, indirected: bool) -> Result<Self, KbError> {
        validate(&data)?;

        let mut adjacency: HashMap<usize, HashMap<usize, Vec<usize>>> = HashMap::new();
        for ((&src, &dst), &rel) in data
            .edges
            .src
            .iter()
            .zip(&data.edges.dst)
            .zip(&data.edge_types)
        {
            let by_node = adjacency.entry(rel).or_default();
            by_node.entry(src).or_default().push(dst);
            if indirected {
                by_node.entry(dst).or_default().push(src);
            }
        }
        for by_node in adjacency.values_mut() {
            for neighbors in by_node.values_mut() {
                neighbors.sort_unstable();
                neighbors.dedup();
            }
        }

        Ok(Self {
            data,
            indirected,
            candidate_types: Vec::new(),
            adjacency,
        })
    }

    /// Marks which node types are retrieval candidates.
    pub fn with_candidate_types(mut self, types: &[&str]) -> Self {
        self.candidate_types = types.iter().map(|t| (*t).to_string()).collect();
        self
    }

    /// The underlying tables.
    pub fn data(&self) -> &ProcessedData {
        &self.data
    }

    /// Consumes the graph and returns its tables.
    pub fn into_data(self) -> ProcessedData {
        self.data
    }

    /// Whether edges are traversable in both directions.
    pub fn is_indirected(&self) -> bool {
        self.indirected
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.data.nodes.len()
    }

    /// Number of stored edges. Indirected graphs do not double this count.
    pub fn num_edges(&self) -> usize {
        self.data.edges.len()
    }

    /// Node type names in id order.
    pub fn node_type_lst(&self) -> Vec<&str> {
        self.data.node_type_dict.values().map(String::as_str).collect()
    }

    /// Relation names in id order.
    pub fn rel_type_lst(&self) -> Vec<&str> {
        self.data.edge_type_dict.values().map(String::as_str).collect()
    }

    /// Attributes of a node.
    pub fn node(&self, id: usize) -> Result<&NodeInfo, KbError> {
        self.data.nodes.get(id).ok_or(KbError::NodeOutOfRange {
            id,
            num_nodes: self.num_nodes(),
        })
    }

    /// Type name of a node.
    pub fn node_type_of(&self, id: usize) -> Result<&str, KbError> {
        let type_id = self
            .data
            .node_types
            .get(id)
            .ok_or(KbError::NodeOutOfRange {
                id,
                num_nodes: self.num_nodes(),
            })?;
        // Presence in the dict is checked by `validate`.
        Ok(self
            .data
            .node_type_dict
            .get(type_id)
            .map_or("", String::as_str))
    }

    /// Ids of all nodes with the given type name, ascending.
    pub fn node_ids_by_type(&self, name: &str) -> Vec<usize> {
        let type_ids: BTreeSet<usize> = self
            .data
            .node_type_dict
            .iter()
            .filter(|(_, n)| n.as_str() == name)
            .map(|(id, _)| *id)
            .collect();
        self.data
            .node_types
            .iter()
            .enumerate()
            .filter(|(_, t)| type_ids.contains(t))
            .map(|(id, _)| id)
            .collect()
    }

    /// Ids of all retrieval candidate nodes, ascending.
    pub fn candidate_ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self
            .candidate_types
            .iter()
            .flat_map(|t| self.node_ids_by_type(t))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Neighbors of a node through one relation, sorted ascending without duplicates.
    pub fn neighbor_nodes(&self, id: usize, rel: &str) -> Result<Vec<usize>, KbError> {
        if id >= self.num_nodes() {
            return Err(KbError::NodeOutOfRange {
                id,
                num_nodes: self.num_nodes(),
            });
        }
        let rel_id = self
            .rel_id(rel)
            .ok_or_else(|| KbError::UnknownRelation(rel.to_string()))?;
        Ok(self
            .adjacency
            .get(&rel_id)
            .and_then(|by_node| by_node.get(&id))
            .cloned()
            .unwrap_or_default())
    }

    /// Distinct `(source type, relation, destination type)` triples, sorted.
    pub fn tuples(&self) -> Vec<(String, String, String)> {
        let triples: BTreeSet<(&str, &str, &str)> = self
            .data
            .edges
            .src
            .iter()
            .zip(&self.data.edges.dst)
            .zip(&self.data.edge_types)
            .map(|((&src, &dst), rel)| {
                (
                    self.node_type_of(src).unwrap_or_default(),
                    self.data.edge_type_dict.get(rel).map_or("", String::as_str),
                    self.node_type_of(dst).unwrap_or_default(),
                )
            })
            .collect();
        triples
            .into_iter()
            .map(|(s, r, d)| (s.to_string(), r.to_string(), d.to_string()))
            .collect()
    }

    /// Number of stored edges per relation name.
    pub fn edge_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts: BTreeMap<&str, usize> = self
            .data
            .edge_type_dict
            .values()
            .map(|name| (name.as_str(), 0))
            .collect();
        for rel in &self.data.edge_types {
            if let Some(name) = self.data.edge_type_dict.get(rel) {
                *counts.entry(name.as_str()).or_default() += 1;
            }
        }
        counts
    }

    /// Number of nodes per type name.
    pub fn node_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts: BTreeMap<&str, usize> = self
            .data
            .node_type_dict
            .values()
            .map(|name| (name.as_str(), 0))
            .collect();
        for t in &self.data.node_types {
            if let Some(name) = self.data.node_type_dict.get(t) {
                *counts.entry(name.as_str()).or_default() += 1;
            }
        }
        counts
    }

    /// Relation id for a relation name.
    fn rel_id(&self, rel: &str) -> Option<usize> {
        self.data
            .edge_type_dict
            .iter()
            .find(|(_, name)| name.as_str() == rel)
            .map(|(id, _)| *id)
    }
}

/// Checks the structural invariants of processed tables.
fn validate(data: &ProcessedData) -> Result<(), KbError> {
    let num_nodes = data.nodes.len();
    if data.node_types.len() != num_nodes {
        return Err(KbError::InconsistentGraph(format!(
            "{} node types for {num_nodes} nodes",
            data.node_types.len()
        )));
    }
    if data.edges.src.len() != data.edges.dst.len() || data.edges.src.len() != data.edge_types.len()
    {
        return Err(KbError::InconsistentGraph(format!(
            "edge vectors differ in length (src {}, dst {}, types {})",
            data.edges.src.len(),
            data.edges.dst.len(),
            data.edge_types.len()
        )));
    }
    if let Some(&id) = data
        .edges
        .src
        .iter()
        .chain(&data.edges.dst)
        .find(|&&id| id >= num_nodes)
    {
        return Err(KbError::NodeOutOfRange { id, num_nodes });
    }
    if let Some(t) = data
        .node_types
        .iter()
        .find(|t| !data.node_type_dict.contains_key(t))
    {
        return Err(KbError::InconsistentGraph(format!(
            "node type id {t} has no name"
        )));
    }
    if let Some(t) = data
        .edge_types
        .iter()
        .find(|t| !data.edge_type_dict.contains_key(t))
    {
        return Err(KbError::InconsistentGraph(format!(
            "edge type id {t} has no name"
        )));
    }
    Ok(())
}
