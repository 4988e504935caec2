//! Implementation of `stark build`.

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use stark_config::format_path_for_display;
use stark_index::{IndexStats, ProgressReporter};

use crate::cli::{args::BuildCommand, context::CommandContext, output::success};

/// Nodes between progress updates.
const PROGRESS_STEP: usize = 500;

/// Prints an in-place indexing counter to stderr.
struct ProgressPrinter {
    /// Whether to print at all; off when stderr is not a terminal.
    enabled: bool,
}

impl ProgressReporter for ProgressPrinter {
    fn on_node(&mut self, _node_id: usize, current: usize, total: usize) {
        if self.enabled && (current % PROGRESS_STEP == 0 || current == total) {
            eprint!("\rIndexing {current}/{total}");
        }
    }

    fn on_complete(&mut self, stats: &IndexStats) {
        if self.enabled && stats.nodes_indexed > 0 {
            eprintln!();
        }
    }
}

/// Loads or builds the knowledge base, then rebuilds the index from it.
pub fn run(ctx: &mut CommandContext, cmd: &BuildCommand) -> ExitCode {
    let mut reporter = ProgressPrinter {
        enabled: io::stderr().is_terminal(),
    };
    let stats = match ctx.rebuild_index(cmd.force, &mut reporter) {
        Ok(stats) => stats,
        Err(code) => return code,
    };
    let index_dir = match ctx.index_dir() {
        Ok(dir) => dir,
        Err(code) => return code,
    };
    let kb = match ctx.kb() {
        Ok(kb) => kb,
        Err(code) => return code,
    };

    let graph = kb.graph();
    println!(
        "Knowledge base: {} nodes, {} edges",
        graph.num_nodes(),
        graph.num_edges()
    );
    println!(
        "{}",
        success(&format!(
            "Indexed {} products into {}",
            stats.nodes_indexed,
            format_path_for_display(&index_dir, Some(&ctx.cwd))
        ))
    );
    ExitCode::SUCCESS
}
