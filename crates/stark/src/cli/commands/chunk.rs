//! Implementation of `stark chunk`.

use std::process::ExitCode;

use crate::cli::{args::ChunkCommand, context::CommandContext, output::dim};

/// Prints one attribute of a node as prose.
pub fn run(ctx: &mut CommandContext, cmd: &ChunkCommand) -> ExitCode {
    let kb = match ctx.kb() {
        Ok(kb) => kb,
        Err(code) => return code,
    };

    let attributes = kb.chunk_attributes();
    if !attributes.contains(&cmd.attribute.as_str()) {
        eprintln!(
            "error: unknown attribute '{}' (expected one of: {})",
            cmd.attribute,
            attributes.join(", ")
        );
        return ExitCode::FAILURE;
    }

    match kb.chunk_info(cmd.id, &cmd.attribute) {
        Ok(chunk) if chunk.is_empty() => {
            eprintln!(
                "{}",
                dim(&format!("node {} has no {}", cmd.id, cmd.attribute))
            );
            ExitCode::SUCCESS
        }
        Ok(chunk) => {
            println!("{}", chunk.trim_end());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
