//! Index location resolution.
//!
//! The index lives in `.stark/index/` next to the most specific `.stark.toml`, or in
//! `~/.stark/index/` when only the global config exists.

use std::path::{Path, PathBuf};

use stark_config::{CONFIG_FILENAME, Config};

/// Directory name for stark data (sibling to .stark.toml).
const STARK_DIR: &str = ".stark";
/// Subdirectory within .stark for the index.
const INDEX_DIR: &str = "index";
/// File inside the index directory holding the config hash.
const CONFIG_HASH_FILE: &str = "config_hash";

/// Computes the index directory from the config root, or `None` without a config file.
pub fn index_directory(config: &Config) -> Option<PathBuf> {
    config.config_root.as_ref().map(|config_root| {
        // Accept the config file path as well as its directory.
        let root_dir = match config_root.file_name() {
            Some(name) if name == CONFIG_FILENAME => {
                config_root.parent().unwrap_or(config_root.as_path())
            }
            _ => config_root.as_path(),
        };
        root_dir.join(STARK_DIR).join(INDEX_DIR)
    })
}

/// Returns the path to the config hash file for an index.
pub fn config_hash_path(index_dir: &Path) -> PathBuf {
    index_dir.join(CONFIG_HASH_FILE)
}
