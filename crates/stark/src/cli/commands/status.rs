//! Implementation of `stark status`.

use std::process::ExitCode;

use stark_config::{Config, ConfigWarning, discover_config_files, format_path_for_display};
use stark_index::{detect_index_status, index_directory};
use stark_kb::{
    AmazonPaths, KbError, SUPPORTED_DATASETS, amazon::meta_links::normalize_link_types,
    raw_file_urls, resolve_categories, store,
};

use crate::cli::{
    context::{CommandContext, download_source},
    output::{dim, subheader, warning},
};

/// A problem found while checking the configuration.
enum Problem {
    /// A warning from configuration validation.
    Config(ConfigWarning),
    /// The dataset selection cannot be loaded.
    Dataset(KbError),
    /// The dataset name is not known.
    UnknownDataset(String),
}

impl Problem {
    /// One-line description.
    fn describe(&self) -> String {
        match self {
            Self::Config(w) => w.to_string(),
            Self::Dataset(e) => e.to_string(),
            Self::UnknownDataset(name) => format!(
                "unknown dataset '{name}' (available: {})",
                SUPPORTED_DATASETS.join(", ")
            ),
        }
    }

    /// Suggested fix, if there is a common one.
    fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Config(ConfigWarning::DatasetDirMissing { .. })
            | Self::Dataset(KbError::MissingRawFile { .. }) => {
                Some("Hint: run `stark fetch`, or set download.enabled = true in .stark.toml")
            }
            Self::Dataset(KbError::InvalidCategories { .. }) => {
                Some("Hint: use categories present in both the review and Q&A dumps, or \"all\"")
            }
            Self::Config(ConfigWarning::NoCategories) => {
                Some("Hint: set dataset.categories in .stark.toml")
            }
            _ => None,
        }
    }
}

/// Shows configuration files, dataset, index status, and validation warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let cwd = &ctx.cwd;

    let config_files = discover_config_files(cwd);
    if config_files.is_empty() {
        println!("{}", dim("No configuration files found."));
        println!();
        println!(
            "Run {} to create a configuration file.",
            subheader("stark init")
        );
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader("Config files:"));
    for path in &config_files {
        println!("   {}", format_path_for_display(path, Some(cwd)));
    }
    println!();

    let config = &ctx.config;
    let dataset = &config.dataset;
    let paths = AmazonPaths::new(config.dataset_dir());

    println!("{}", subheader("Dataset:"));
    println!(
        "   {} {}",
        dataset.name,
        dim(&format!(
            "-> {}",
            format_path_for_display(&paths.root, config.config_root.as_deref())
        ))
    );
    println!("   categories: {}", dataset.categories.join(", "));
    println!("   meta links: {}", list_or_none(&dataset.meta_link_types));
    let processed = if store::exists(&paths.processed_dir()) {
        "processed"
    } else {
        "not processed"
    };
    println!("   data: {processed}");
    println!();

    let index_status = detect_index_status(config);
    print!("{}\n   {}", subheader("Index:"), index_status.description());
    if let Some(path) = index_directory(config) {
        println!(
            " {}",
            dim(&format!("({})", format_path_for_display(&path, Some(cwd))))
        );
    } else {
        println!();
    }
    println!();

    let problems = collect_problems(config, &paths);
    if problems.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader(&format!("Warnings ({}):", problems.len())));
    for problem in &problems {
        println!("   {}", warning(&problem.describe()));
    }
    println!();

    let mut hints: Vec<&str> = problems.iter().filter_map(Problem::hint).collect();
    hints.dedup();
    for hint in hints {
        println!("{}", dim(hint));
    }

    ExitCode::FAILURE
}

/// Comma-separated values, or `(none)`.
fn list_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

/// Runs configuration validation plus the checks that need dataset knowledge.
fn collect_problems(config: &Config, paths: &AmazonPaths) -> Vec<Problem> {
    let mut problems: Vec<Problem> = config.validate().into_iter().map(Problem::Config).collect();
    let dataset = &config.dataset;

    if !SUPPORTED_DATASETS.contains(&dataset.name.as_str()) {
        problems.push(Problem::UnknownDataset(dataset.name.clone()));
        return problems;
    }
    if let Err(e) = normalize_link_types(&dataset.meta_link_types) {
        problems.push(Problem::Dataset(e));
    }
    let selection = match resolve_categories(&dataset.categories) {
        Ok(selection) => selection,
        Err(e) => {
            problems.push(Problem::Dataset(e));
            return problems;
        }
    };

    // Raw files only matter until the dataset has been processed.
    let dataset_dir_missing = problems
        .iter()
        .any(|p| matches!(p, Problem::Config(ConfigWarning::DatasetDirMissing { .. })));
    if !config.download.enabled
        && !dataset_dir_missing
        && !store::exists(&paths.processed_dir())
    {
        let raw_dir = paths.raw_dir();
        for file in raw_file_urls(&download_source(config), &selection) {
            let path = raw_dir.join(&file.file_name);
            if !path.exists() {
                problems.push(Problem::Dataset(KbError::MissingRawFile { path }));
            }
        }
    }
    problems
}
