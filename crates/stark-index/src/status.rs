//! Index status detection.
//!
//! Compares the stored config hash against the current configuration.

use std::{fs, io, path::Path};

use stark_config::Config;

use crate::{
    config_hash::compute_config_hash,
    location::{config_hash_path, index_directory},
};

/// Tantivy's marker file for an existing index.
const META_FILE: &str = "meta.json";

/// Status of the retrieval index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// Index exists and matches current configuration.
    Current,
    /// Index exists but was built with different settings.
    ConfigChanged,
    /// No index exists.
    Missing,
}

impl IndexStatus {
    /// Returns a human-readable description for display.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::ConfigChanged => "stale (config changed)",
            Self::Missing => "missing",
        }
    }

    /// Returns true if the index must be rebuilt before searching.
    pub fn needs_rebuild(&self) -> bool {
        !matches!(self, Self::Current)
    }
}

/// Reads the stored config hash, or `None` if it is absent or unreadable.
pub fn read_stored_hash(index_dir: &Path) -> Option<String> {
    fs::read_to_string(config_hash_path(index_dir))
        .ok()
        .map(|s| s.trim().to_string())
}

/// Writes the config hash, creating the index directory if needed.
pub fn write_config_hash(index_dir: &Path, hash: &str) -> io::Result<()> {
    fs::create_dir_all(index_dir)?;
    fs::write(config_hash_path(index_dir), hash)
}

/// Checks if a Tantivy index exists in `index_dir`.
pub fn index_exists(index_dir: &Path) -> bool {
    index_dir.join(META_FILE).exists()
}

/// Determines the current status of the index for `config`.
pub fn detect_index_status(config: &Config) -> IndexStatus {
    let Some(index_dir) = index_directory(config) else {
        return IndexStatus::Missing;
    };
    if !index_exists(&index_dir) {
        return IndexStatus::Missing;
    }

    match read_stored_hash(&index_dir) {
        Some(stored) if stored == compute_config_hash(config) => IndexStatus::Current,
        // A missing hash means an interrupted build.
        _ => IndexStatus::ConfigChanged,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;

    /// A config rooted at `root` with an index directory created under it.
    fn config_with_index(root: &Path) -> (Config, PathBuf) {
        let config = Config {
            config_root: Some(root.to_path_buf()),
            ..Default::default()
        };
        let index_dir = root.join(".stark").join("index");
        fs::create_dir_all(&index_dir).unwrap();
        (config, index_dir)
    }

    #[test]
    fn status_descriptions() {
        assert_eq!(IndexStatus::Current.description(), "current");
        assert_eq!(
            IndexStatus::ConfigChanged.description(),
            "stale (config changed)"
        );
        assert_eq!(IndexStatus::Missing.description(), "missing");
        assert!(!IndexStatus::Current.needs_rebuild());
        assert!(IndexStatus::ConfigChanged.needs_rebuild());
        assert!(IndexStatus::Missing.needs_rebuild());
    }

    #[test]
    fn read_write_config_hash() {
        let temp = TempDir::new().unwrap();
        let index_dir = temp.path().join("index");
        assert!(read_stored_hash(&index_dir).is_none());

        write_config_hash(&index_dir, "abc123def456").unwrap();
        assert_eq!(read_stored_hash(&index_dir).as_deref(), Some("abc123def456"));

        fs::write(config_hash_path(&index_dir), "  abc123  \n").unwrap();
        assert_eq!(read_stored_hash(&index_dir).as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_without_config_root() {
        assert_eq!(detect_index_status(&Config::default()), IndexStatus::Missing);
    }

    #[test]
    fn missing_without_meta_json() {
        let temp = TempDir::new().unwrap();
        let (config, _) = config_with_index(temp.path());
        assert_eq!(detect_index_status(&config), IndexStatus::Missing);
    }

    #[test]
    fn config_changed_without_or_with_other_hash() {
        let temp = TempDir::new().unwrap();
        let (config, index_dir) = config_with_index(temp.path());
        fs::write(index_dir.join(META_FILE), "{}").unwrap();
        assert_eq!(detect_index_status(&config), IndexStatus::ConfigChanged);

        write_config_hash(&index_dir, "old_hash").unwrap();
        assert_eq!(detect_index_status(&config), IndexStatus::ConfigChanged);
    }

    #[test]
    fn current_when_hash_matches() {
        let temp = TempDir::new().unwrap();
        let (config, index_dir) = config_with_index(temp.path());
        fs::write(index_dir.join(META_FILE), "{}").unwrap();
        write_config_hash(&index_dir, &compute_config_hash(&config)).unwrap();
        assert_eq!(detect_index_status(&config), IndexStatus::Current);

        let mut changed = config;
        changed.dataset.max_entries = 3;
        assert_eq!(detect_index_status(&changed), IndexStatus::ConfigChanged);
    }
}
