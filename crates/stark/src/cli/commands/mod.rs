//! Command implementations and dispatch.

pub mod build;
pub mod chunk;
pub mod config;
pub mod doc;
pub mod eval;
pub mod fetch;
pub mod init;
pub mod neighbors;
pub mod search;
pub mod stats;
pub mod status;
pub mod update;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &mut CommandContext) -> ExitCode {
    match command {
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Status => status::run(ctx),
        Commands::Config => config::run(ctx),
        Commands::Fetch => fetch::run(ctx),
        Commands::Build(cmd) => build::run(ctx, &cmd),
        Commands::Update => update::run(ctx),
        Commands::Stats(cmd) => stats::run(ctx, &cmd),
        Commands::Doc(cmd) => doc::run(ctx, &cmd),
        Commands::Chunk(cmd) => chunk::run(ctx, &cmd),
        Commands::Neighbors(cmd) => neighbors::run(ctx, &cmd),
        Commands::Search(cmd) => search::run(ctx, &cmd),
        Commands::Eval(cmd) => eval::run(ctx, &cmd),
    }
}
