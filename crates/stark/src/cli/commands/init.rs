//! Implementation of `stark init`.

use std::{
    fs,
    io::{self, Write},
    path::Path,
    process::ExitCode,
};

use stark_config::{CONFIG_FILENAME, global_config_path, global_template, local_template};
use stark_highlight::{Highlighter, subheader};

use crate::cli::{args::InitCommand, context::CommandContext};

/// Directory holding generated state next to a config file.
const STATE_PATTERN: &str = ".stark/";

/// Initializes a `.stark.toml` configuration file.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let cwd = &ctx.cwd;

    let is_home_dir = global_config_path()
        .and_then(|p| p.parent().map(|h| h == cwd))
        .unwrap_or(false);
    let use_global = cmd.global || is_home_dir;

    let config_path = if use_global {
        match global_config_path() {
            Some(path) => path,
            None => {
                eprintln!("error: could not determine home directory");
                return ExitCode::FAILURE;
            }
        }
    } else {
        cwd.join(CONFIG_FILENAME)
    };

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let template = if use_global {
        global_template()
    } else {
        local_template()
    };

    if let Err(e) = fs::write(&config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!("Created {}", config_path.display());
    println!();
    println!("{}", subheader("Configuration written:"));
    print!("{}", Highlighter::new().highlight_toml(&template));
    println!();

    if !use_global && let Err(e) = update_gitignore(&config_path) {
        eprintln!("warning: could not update .gitignore: {e}");
    }

    ExitCode::SUCCESS
}

/// Adds `.stark/` to `.gitignore` if it exists and doesn't already contain it.
fn update_gitignore(config_path: &Path) -> io::Result<()> {
    let Some(parent) = config_path.parent() else {
        return Ok(());
    };

    let gitignore_path = parent.join(".gitignore");
    if !gitignore_path.exists() {
        return Ok(());
    }

    let contents = fs::read_to_string(&gitignore_path)?;
    let bare = STATE_PATTERN.trim_end_matches('/');
    if contents
        .lines()
        .map(str::trim)
        .any(|line| line == STATE_PATTERN || line == bare)
    {
        return Ok(());
    }

    let mut file = fs::OpenOptions::new().append(true).open(&gitignore_path)?;
    if !contents.is_empty() && !contents.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "{STATE_PATTERN}")?;
    println!("Added {STATE_PATTERN} to .gitignore");

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn gitignore_gets_state_dir_once() {
        let temp = TempDir::new().unwrap();
        let gitignore = temp.path().join(".gitignore");
        fs::write(&gitignore, "target").unwrap();
        let config = temp.path().join(CONFIG_FILENAME);

        update_gitignore(&config).unwrap();
        update_gitignore(&config).unwrap();
        assert_eq!(fs::read_to_string(&gitignore).unwrap(), "target\n.stark/\n");
    }

    #[test]
    fn bare_pattern_counts_as_present() {
        let temp = TempDir::new().unwrap();
        let gitignore = temp.path().join(".gitignore");
        fs::write(&gitignore, ".stark\n").unwrap();

        update_gitignore(&temp.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(fs::read_to_string(&gitignore).unwrap(), ".stark\n");
    }

    #[test]
    fn missing_gitignore_is_left_alone() {
        let temp = TempDir::new().unwrap();
        update_gitignore(&temp.path().join(CONFIG_FILENAME)).unwrap();
        assert!(!temp.path().join(".gitignore").exists());
    }
}
