//! Path resolution for configured directories.
//!
//! Resolves relative and tilde-prefixed paths against the directory of the config file that
//! declared them, and formats paths compactly for terminal display.

use std::path::{Component, Path, PathBuf};

use directories::BaseDirs;

use crate::ConfigError;

/// Resolves a data root to an absolute path.
///
/// Handles three cases:
/// - Tilde paths (`~/data`) - expanded to home directory
/// - Relative paths (`./data`, `../shared`) - resolved relative to `config_dir`
/// - Absolute paths - returned as-is
///
/// Unlike index or tree paths, the data root need not exist yet: `stark build` creates it.
pub fn resolve_data_root(path: &str, config_dir: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = expand_tilde(path)?;

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        config_dir.join(&expanded)
    };

    Ok(normalize_lexically(&absolute))
}

/// Formats a path for display, relative to `base` when it lies underneath it.
///
/// Paths under the home directory are otherwise shown with a `~` prefix.
pub fn format_path_for_display(path: &Path, base: Option<&Path>) -> String {
    if let Some(base) = base
        && let Some(relative) = pathdiff::diff_paths(path, base)
        && !relative
            .components()
            .any(|c| matches!(c, Component::ParentDir))
    {
        if relative.as_os_str().is_empty() {
            return ".".to_string();
        }
        return relative.display().to_string();
    }

    if let Some(dirs) = BaseDirs::new()
        && let Ok(rest) = path.strip_prefix(dirs.home_dir())
    {
        return Path::new("~").join(rest).display().to_string();
    }

    path.display().to_string()
}

/// Expands a tilde prefix to the home directory.
///
/// - `~` alone becomes the home directory
/// - `~/foo` becomes home directory joined with `foo`
/// - Paths not starting with `~` are returned unchanged
fn expand_tilde(path: &str) -> Result<PathBuf, ConfigError> {
    if path == "~" {
        return home_dir();
    }

    if let Some(rest) = path.strip_prefix("~/") {
        let home = home_dir()?;
        return Ok(home.join(rest));
    }

    Ok(PathBuf::from(path))
}

/// Removes `.` components and folds `..` into its parent without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Returns the home directory.
fn home_dir() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDirectory)
}
