//! Implementation of `stark neighbors`.

use std::{collections::BTreeMap, process::ExitCode};

use comfy_table::Cell;
use serde::Serialize;
use stark_kb::{KbError, KnowledgeBase};

use crate::cli::{
    args::NeighborsCommand,
    context::CommandContext,
    output::{dim, number_cell, print_json, table},
};

/// A neighboring node.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct Neighbor {
    /// Node id.
    id: usize,
    /// Node type name.
    node_type: String,
    /// Node label.
    title: String,
}

/// Neighbors of one node, grouped by relation.
#[derive(Debug, Serialize)]
struct NeighborsOutput {
    /// The queried node.
    id: usize,
    /// Neighbors per relation name, ascending by id.
    relations: BTreeMap<String, Vec<Neighbor>>,
}

/// Lists the neighbors of a node over one relation or all of them.
pub fn run(ctx: &mut CommandContext, cmd: &NeighborsCommand) -> ExitCode {
    let kb = match ctx.kb() {
        Ok(kb) => kb,
        Err(code) => return code,
    };
    let output = match collect(kb, cmd.id, cmd.relation.as_deref()) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return print_json(&output);
    }
    if output.relations.values().all(Vec::is_empty) {
        println!("{}", dim(&format!("node {} has no neighbors", cmd.id)));
        return ExitCode::SUCCESS;
    }

    let mut rows = table(&["relation", "node", "type", "title"]);
    for (relation, neighbors) in &output.relations {
        for neighbor in neighbors {
            rows.add_row(vec![
                Cell::new(relation),
                number_cell(neighbor.id),
                Cell::new(&neighbor.node_type),
                Cell::new(&neighbor.title),
            ]);
        }
    }
    println!("{rows}");
    ExitCode::SUCCESS
}

/// Looks up neighbors over `relation`, or over every relation with at least one neighbor.
fn collect(
    kb: &dyn KnowledgeBase,
    id: usize,
    relation: Option<&str>,
) -> Result<NeighborsOutput, KbError> {
    let graph = kb.graph();
    // Fails early for unknown ids, even when the node has no edges.
    graph.node(id)?;

    let relations: Vec<&str> = match relation {
        Some(rel) => vec![rel],
        None => graph.rel_type_lst(),
    };

    let mut grouped = BTreeMap::new();
    for rel in relations {
        let ids = graph.neighbor_nodes(id, rel)?;
        if ids.is_empty() && relation.is_none() {
            continue;
        }
        let neighbors = ids
            .into_iter()
            .map(|n| {
                Ok(Neighbor {
                    id: n,
                    node_type: graph.node_type_of(n)?.to_string(),
                    title: kb.title(n)?.to_string(),
                })
            })
            .collect::<Result<Vec<_>, KbError>>()?;
        grouped.insert(rel.to_string(), neighbors);
    }
    Ok(NeighborsOutput {
        id,
        relations: grouped,
    })
}
