//! Implementation of `stark fetch`.

use std::process::ExitCode;

use stark_config::format_path_for_display;
use stark_kb::{AmazonPaths, KbError, SUPPORTED_DATASETS, fetch_raw, resolve_categories};

use crate::cli::{
    context::{CommandContext, download_source},
    output::success,
};

/// Downloads the raw files of the configured categories that are not on disk yet.
///
/// Runs whether or not `download.enabled` is set.
pub fn run(ctx: &CommandContext) -> ExitCode {
    match fetch(ctx) {
        Ok(0) => {
            println!("All raw files already present.");
            ExitCode::SUCCESS
        }
        Ok(count) => {
            println!("{}", success(&format!("Downloaded {count} raw files.")));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Fetches missing raw files and returns how many were downloaded.
fn fetch(ctx: &CommandContext) -> Result<usize, KbError> {
    let config = &ctx.config;
    if !SUPPORTED_DATASETS.contains(&config.dataset.name.as_str()) {
        return Err(KbError::UnknownDataset(config.dataset.name.clone()));
    }
    let selection = resolve_categories(&config.dataset.categories)?;
    let raw_dir = AmazonPaths::new(config.dataset_dir()).raw_dir();
    println!(
        "Fetching raw files into {}",
        format_path_for_display(&raw_dir, Some(&ctx.cwd))
    );
    fetch_raw(&download_source(config), &selection, &raw_dir)
}
