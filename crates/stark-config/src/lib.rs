//! Configuration system for stark.
//!
//! stark uses TOML configuration files named `.stark.toml`. Configuration is resolved by walking
//! up the directory tree from the current working directory, collecting any `.stark.toml` files
//! found, then loading `~/.stark.toml` as the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod resolve;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawDatasetSettings, RawDownloadSettings, RawSearchSettings, parse_config_file,
    parse_config_str,
};
pub use resolve::{format_path_for_display, resolve_data_root};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Default dataset name.
pub const DEFAULT_DATASET: &str = "amazon";
/// Default data root directory, relative to the config root.
pub const DEFAULT_DATA_ROOT: &str = "data";
/// Default product categories.
pub const DEFAULT_CATEGORIES: &[&str] = &["Sports_and_Outdoors"];
/// Default meta link types.
pub const DEFAULT_META_LINK_TYPES: &[&str] = &["brand"];
/// Default cap on review and Q&A entries rendered per product.
pub const DEFAULT_MAX_ENTRIES: usize = 25;
/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;
/// Default stemmer language.
pub const DEFAULT_STEMMER: &str = "english";
/// Default base URL for Amazon review and metadata dumps.
pub const DEFAULT_REVIEW_BASE: &str = "https://datarepo.eng.ucsd.edu/mcauley_group/data/amazon_v2";
/// Default base URL for Amazon question-answer dumps.
pub const DEFAULT_QA_BASE: &str = "https://datarepo.eng.ucsd.edu/mcauley_group/data/amazon/qa";

/// Top-level merged configuration for stark.
///
/// This represents the fully resolved configuration after merging all discovered `.stark.toml`
/// files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Dataset selection and construction settings.
    pub dataset: DatasetSettings,
    /// Raw data download settings.
    pub download: DownloadSettings,
    /// Search-related settings.
    pub search: SearchSettings,
    /// Directory containing the most specific config file (determines index location).
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.stark.toml` files.
    ///
    /// This is the main entry point for loading configuration. It:
    /// 1. Discovers all `.stark.toml` files from `cwd` up to the filesystem root
    /// 2. Appends `~/.stark.toml` if it exists
    /// 3. Parses each file
    /// 4. Merges them according to precedence rules (closest to `cwd` wins)
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Directory holding the selected dataset: `<root>/<name>`.
    pub fn dataset_dir(&self) -> PathBuf {
        self.dataset.root.join(&self.dataset.name)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The dataset root is written as its resolved absolute path.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            dataset: &self.dataset,
            download: &self.download,
            search: &self.search,
        };
        toml::to_string_pretty(&serializable).map_err(ConfigError::SerializeToml)
    }
}

/// Settings that select and shape the knowledge base.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// Dataset name (currently `amazon`).
    pub name: String,
    /// Directory that holds one subdirectory per dataset.
    pub root: PathBuf,
    /// Product categories to load, or `["all"]`.
    pub categories: Vec<String>,
    /// Attributes turned into entity nodes with `has_<type>` relations.
    pub meta_link_types: Vec<String>,
    /// Maximum review and Q&A entries rendered per product.
    pub max_entries: usize,
    /// Whether relations are traversable in both directions.
    pub indirected: bool,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_DATASET.to_string(),
            root: PathBuf::from(DEFAULT_DATA_ROOT),
            categories: DEFAULT_CATEGORIES.iter().map(|s| (*s).to_string()).collect(),
            meta_link_types: DEFAULT_META_LINK_TYPES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_entries: DEFAULT_MAX_ENTRIES,
            indirected: true,
        }
    }
}

/// Raw data download settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// Download missing raw files automatically during `stark build`.
    pub enabled: bool,
    /// Base URL for review and metadata dumps.
    pub review_base: String,
    /// Base URL for question-answer dumps.
    pub qa_base: String,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            review_base: DEFAULT_REVIEW_BASE.to_string(),
            qa_base: DEFAULT_QA_BASE.to_string(),
        }
    }
}

/// Search-related settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Stemming language.
    pub stemmer: String,
    /// Maximum results per query.
    pub limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            stemmer: String::from(DEFAULT_STEMMER),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Dataset settings.
    dataset: &'a DatasetSettings,
    /// Download settings.
    download: &'a DownloadSettings,
    /// Search settings.
    search: &'a SearchSettings,
}
