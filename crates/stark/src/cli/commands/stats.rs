//! Implementation of `stark stats`.

use std::{collections::BTreeMap, process::ExitCode};

use comfy_table::Cell;
use serde::Serialize;
use stark_kb::KnowledgeBase;

use crate::cli::{
    args::StatsCommand,
    context::CommandContext,
    output::{number_cell, print_json, subheader, table},
};

/// Summary of a knowledge base.
#[derive(Debug, Serialize)]
struct KbStats<'a> {
    /// Dataset name.
    dataset: &'a str,
    /// Total node count.
    num_nodes: usize,
    /// Stored edge count.
    num_edges: usize,
    /// Number of candidate nodes.
    num_candidates: usize,
    /// Whether relations are traversable in both directions.
    indirected: bool,
    /// Node count per type.
    node_types: BTreeMap<&'a str, usize>,
    /// Edge count per relation.
    relations: BTreeMap<&'a str, usize>,
    /// Distinct `(source type, relation, destination type)` triples.
    tuples: Vec<(String, String, String)>,
}

impl<'a> KbStats<'a> {
    /// Collects the summary of `kb`.
    fn of(kb: &'a dyn KnowledgeBase) -> Self {
        let graph = kb.graph();
        Self {
            dataset: kb.name(),
            num_nodes: graph.num_nodes(),
            num_edges: graph.num_edges(),
            num_candidates: graph.candidate_ids().len(),
            indirected: graph.is_indirected(),
            node_types: graph.node_counts(),
            relations: graph.edge_counts(),
            tuples: graph.tuples(),
        }
    }
}

/// Shows node and edge counts of the knowledge base.
pub fn run(ctx: &mut CommandContext, cmd: &StatsCommand) -> ExitCode {
    let kb = match ctx.kb() {
        Ok(kb) => kb,
        Err(code) => return code,
    };
    let stats = KbStats::of(kb);
    if cmd.json {
        return print_json(&stats);
    }

    println!(
        "{}: {} nodes ({} candidates), {} edges{}",
        subheader(stats.dataset),
        stats.num_nodes,
        stats.num_candidates,
        stats.num_edges,
        if stats.indirected { ", indirected" } else { "" }
    );
    println!();

    let mut nodes = table(&["node type", "count"]);
    for (name, count) in &stats.node_types {
        nodes.add_row(vec![Cell::new(name), number_cell(count)]);
    }
    println!("{nodes}");

    let mut relations = table(&["source", "relation", "target", "edges"]);
    for (src, rel, dst) in &stats.tuples {
        let count = stats.relations.get(rel.as_str()).copied().unwrap_or_default();
        relations.add_row(vec![
            Cell::new(src),
            Cell::new(rel),
            Cell::new(dst),
            number_cell(count),
        ]);
    }
    println!("{relations}");
    ExitCode::SUCCESS
}
