//! Command-line interface for the `stark` knowledge base tool.

use std::process::ExitCode;

use stark::cli::{
    args::{Commands, parse_cli},
    commands,
    context::CommandContext,
    logging,
};

/// Parses arguments, sets up logging and runs the selected command.
fn main() -> ExitCode {
    let cli = parse_cli();
    logging::init(cli.verbose);

    // `init` must work even when an existing config file is broken.
    let ctx = match cli.command {
        Commands::Init(_) => CommandContext::load_cwd_only(),
        _ => CommandContext::load(),
    };
    match ctx {
        Ok(mut ctx) => commands::run(cli.command, &mut ctx),
        Err(code) => code,
    }
}
