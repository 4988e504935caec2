//! Implementation of `stark update`.

use std::process::ExitCode;

use stark_index::{SilentReporter, detect_index_status};

use crate::cli::{context::CommandContext, output::success};

/// Rebuilds the index when it is missing or was built with other settings.
pub fn run(ctx: &mut CommandContext) -> ExitCode {
    let status = detect_index_status(&ctx.config);
    if !status.needs_rebuild() {
        println!("Index is current.");
        return ExitCode::SUCCESS;
    }

    println!("Index {}, rebuilding...", status.description());
    match ctx.rebuild_index(false, &mut SilentReporter) {
        Ok(stats) => {
            println!(
                "{}",
                success(&format!("Indexed {} products.", stats.nodes_indexed))
            );
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}
