//! Implementation of `stark doc`.

use std::process::ExitCode;

use crate::cli::{args::DocCommand, context::CommandContext};

/// Prints the document of a node.
pub fn run(ctx: &mut CommandContext, cmd: &DocCommand) -> ExitCode {
    let kb = match ctx.kb() {
        Ok(kb) => kb,
        Err(code) => return code,
    };
    match kb.doc_info(cmd.id, !cmd.no_rel, cmd.compact) {
        Ok(doc) => {
            println!("{doc}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
