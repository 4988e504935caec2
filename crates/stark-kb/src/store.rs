//! Persistence of processed knowledge base tables.
//!
//! A store directory holds three JSON files: `node_info.json` (node attributes in id order),
//! `edges.json` (edge endpoints and relation ids) and `types.json` (type ids and names).
//! `node_info.json` is written last and marks a complete store.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info};

use crate::{
    error::KbError,
    graph::{EdgeIndex, ProcessedData},
    node::NodeInfo,
};

/// Node attributes file.
pub const NODE_INFO_FILE: &str = "node_info.json";
/// Edge list file.
pub const EDGES_FILE: &str = "edges.json";
/// Type tables file.
pub const TYPES_FILE: &str = "types.json";

/// On-disk layout of `edges.json`.
#[derive(Serialize, Deserialize)]
struct EdgesFile {
    /// Source node of each edge.
    src: Vec<usize>,
    /// Destination node of each edge.
    dst: Vec<usize>,
    /// Relation id of each edge.
    edge_types: Vec<usize>,
}

/// On-disk layout of `types.json`.
#[derive(Serialize, Deserialize)]
struct TypesFile {
    /// Type id of each node.
    node_types: Vec<usize>,
    /// Node type names.
    node_type_dict: BTreeMap<usize, String>,
    /// Relation names.
    edge_type_dict: BTreeMap<usize, String>,
}

/// Whether `dir` holds a complete store.
pub fn exists(dir: &Path) -> bool {
    dir.join(NODE_INFO_FILE).is_file()
}

/// Writes processed tables to `dir`, creating it if needed.
pub fn save(dir: &Path, data: &ProcessedData) -> Result<(), KbError> {
    fs::create_dir_all(dir).map_err(|e| KbError::io(dir, e))?;
    // Remove the completion marker first so an interrupted save never looks complete.
    let marker = dir.join(NODE_INFO_FILE);
    if marker.exists() {
        fs::remove_file(&marker).map_err(|e| KbError::io(&marker, e))?;
    }

    write_json(
        &dir.join(EDGES_FILE),
        &EdgesFile {
            src: data.edges.src.clone(),
            dst: data.edges.dst.clone(),
            edge_types: data.edge_types.clone(),
        },
    )?;
    write_json(
        &dir.join(TYPES_FILE),
        &TypesFile {
            node_types: data.node_types.clone(),
            node_type_dict: data.node_type_dict.clone(),
            edge_type_dict: data.edge_type_dict.clone(),
        },
    )?;
    write_json(&marker, &data.nodes)?;
    info!(dir = %dir.display(), nodes = data.nodes.len(), "saved processed data");
    Ok(())
}

/// Reads processed tables from `dir`.
pub fn load(dir: &Path) -> Result<ProcessedData, KbError> {
    let nodes: Vec<NodeInfo> = read_json(&dir.join(NODE_INFO_FILE))?;
    let edges: EdgesFile = read_json(&dir.join(EDGES_FILE))?;
    let types: TypesFile = read_json(&dir.join(TYPES_FILE))?;
    debug!(dir = %dir.display(), nodes = nodes.len(), "loaded processed data");
    Ok(ProcessedData {
        nodes,
        node_types: types.node_types,
        node_type_dict: types.node_type_dict,
        edges: EdgeIndex {
            src: edges.src,
            dst: edges.dst,
        },
        edge_types: edges.edge_types,
        edge_type_dict: types.edge_type_dict,
    })
}

/// Serializes `value` to `path`.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), KbError> {
    let file = File::create(path).map_err(|e| KbError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value).map_err(|source| KbError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|e| KbError::io(path, e))
}

/// Deserializes `path`.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, KbError> {
    let file = File::open(path).map_err(|e| KbError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| KbError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::sample_data;

    #[test]
    fn round_trip_preserves_tables() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("processed/cache/brand");
        let data = sample_data();

        assert!(!exists(&store));
        save(&store, &data).unwrap();
        assert!(exists(&store));
        assert_eq!(load(&store).unwrap(), data);
    }

    #[test]
    fn save_overwrites_previous_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut data = sample_data();
        save(dir.path(), &data).unwrap();
        data.nodes.truncate(3);
        data.node_types.truncate(3);
        data.edges = EdgeIndex::default();
        data.edge_types.clear();
        save(dir.path(), &data).unwrap();
        assert_eq!(load(dir.path()).unwrap().nodes.len(), 3);
    }

    #[test]
    fn corrupt_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        save(dir.path(), &sample_data()).unwrap();
        fs::write(dir.path().join(EDGES_FILE), "{").unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(err.to_string().contains(EDGES_FILE));
    }
}
