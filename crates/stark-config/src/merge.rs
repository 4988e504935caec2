//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules and resolving the data root.

use std::path::{Path, PathBuf};

use crate::{
    Config, ConfigError, DEFAULT_DATA_ROOT, DatasetSettings, DownloadSettings, SearchSettings,
    parse::{RawConfig, RawDatasetSettings, RawDownloadSettings, RawSearchSettings},
    resolve::resolve_data_root,
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory containing the config file.
    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - List settings (`categories`, `meta_link_types`): first defined list wins whole
/// - `dataset.root`: resolved against the directory of the file that defines it; when no file
///   defines it, `data/` next to the highest-precedence config
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    let Some(first) = configs.first() else {
        return Ok(Config::default());
    };

    let mut dataset = DatasetSettings::default();
    let mut download = DownloadSettings::default();
    let mut search = SearchSettings::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref raw) = parsed.config.dataset {
            apply_raw_dataset(&mut dataset, raw, parsed.dir())?;
        }
        if let Some(ref raw) = parsed.config.download {
            apply_raw_download(&mut download, raw);
        }
        if let Some(ref raw) = parsed.config.search {
            apply_raw_search(&mut search, raw);
        }
    }

    let config_root = first.dir().to_path_buf();

    let root_declared = configs.iter().any(|parsed| {
        parsed
            .config
            .dataset
            .as_ref()
            .is_some_and(|d| d.root.is_some())
    });
    if !root_declared {
        dataset.root = config_root.join(DEFAULT_DATA_ROOT);
    }

    Ok(Config {
        dataset,
        download,
        search,
        config_root: Some(config_root),
    })
}

/// Applies raw dataset settings to result, overwriting any present values.
fn apply_raw_dataset(
    result: &mut DatasetSettings,
    raw: &RawDatasetSettings,
    config_dir: &Path,
) -> Result<(), ConfigError> {
    if let Some(ref v) = raw.name {
        result.name = v.clone();
    }
    if let Some(ref v) = raw.root {
        result.root = resolve_data_root(v, config_dir)?;
    }
    if let Some(ref v) = raw.categories {
        result.categories = v.clone();
    }
    if let Some(ref v) = raw.meta_link_types {
        result.meta_link_types = v.clone();
    }
    if let Some(v) = raw.max_entries {
        result.max_entries = v;
    }
    if let Some(v) = raw.indirected {
        result.indirected = v;
    }
    Ok(())
}

/// Applies raw download settings to result.
fn apply_raw_download(result: &mut DownloadSettings, raw: &RawDownloadSettings) {
    if let Some(v) = raw.enabled {
        result.enabled = v;
    }
    if let Some(ref v) = raw.review_base {
        result.review_base = v.trim_end_matches('/').to_string();
    }
    if let Some(ref v) = raw.qa_base {
        result.qa_base = v.trim_end_matches('/').to_string();
    }
}

/// Applies raw search settings to result.
fn apply_raw_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(ref v) = raw.stemmer {
        result.stemmer = v.clone();
    }
    if let Some(v) = raw.limit {
        result.limit = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_config_str;

    /// Builds a parsed config at `dir/.stark.toml` from TOML text.
    fn parsed(dir: &str, toml: &str) -> ParsedConfig {
        let path = PathBuf::from(dir).join(".stark.toml");
        let config = parse_config_str(toml, &path).unwrap();
        ParsedConfig { path, config }
    }

    #[test]
    fn test_merge_empty_configs() {
        let result = merge_configs(&[]).unwrap();
        assert_eq!(result.dataset.name, "amazon");
        assert!(result.config_root.is_none());
    }

    #[test]
    fn test_default_root_is_next_to_closest_config() {
        let result = merge_configs(&[parsed("/work/project", "")]).unwrap();
        assert_eq!(result.dataset.root, PathBuf::from("/work/project/data"));
        assert_eq!(result.config_root, Some(PathBuf::from("/work/project")));
    }

    #[test]
    fn test_closest_scalar_wins() {
        let configs = [
            parsed("/work/project", "[dataset]\nmax_entries = 5\n"),
            parsed(
                "/home/user",
                "[dataset]\nmax_entries = 50\nindirected = false\n[search]\nlimit = 7\n",
            ),
        ];
        let result = merge_configs(&configs).unwrap();
        assert_eq!(result.dataset.max_entries, 5);
        assert!(!result.dataset.indirected);
        assert_eq!(result.search.limit, 7);
    }

    #[test]
    fn test_root_resolves_against_declaring_file() {
        let configs = [
            parsed("/work/project", "[search]\nstemmer = \"german\"\n"),
            parsed("/home/user", "[dataset]\nroot = \"kb\"\n"),
        ];
        let result = merge_configs(&configs).unwrap();
        assert_eq!(result.dataset.root, PathBuf::from("/home/user/kb"));
        assert_eq!(result.search.stemmer, "german");
        assert_eq!(result.config_root, Some(PathBuf::from("/work/project")));
    }

    #[test]
    fn test_category_list_replaced_whole() {
        let configs = [
            parsed("/a", "[dataset]\ncategories = [\"Toys_and_Games\"]\n"),
            parsed(
                "/b",
                "[dataset]\ncategories = [\"Automotive\", \"Electronics\"]\n",
            ),
        ];
        let result = merge_configs(&configs).unwrap();
        assert_eq!(result.dataset.categories, vec!["Toys_and_Games"]);
    }

    #[test]
    fn test_download_base_trailing_slash_trimmed() {
        let configs = [parsed(
            "/a",
            "[download]\nenabled = true\nreview_base = \"http://mirror/amazon_v2/\"\n",
        )];
        let result = merge_configs(&configs).unwrap();
        assert!(result.download.enabled);
        assert_eq!(result.download.review_base, "http://mirror/amazon_v2");
    }
}
