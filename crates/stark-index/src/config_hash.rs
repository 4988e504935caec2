//! Configuration hash computation for index versioning.
//!
//! The index stores a hash of the settings that shape its documents. When any of them
//! changes, the hash changes and `stark status` reports the index as stale.
//!
//! Settings that affect the hash:
//! - Schema version (internal, bumped when field definitions or document rendering change)
//! - Stemmer language
//! - Dataset name, categories and meta link types
//! - Review and Q&A cap per document
//! - Whether relations are traversed in both directions

use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher24;
use stark_config::Config;

/// Current schema version. Bump this when index field definitions change.
pub const SCHEMA_VERSION: u32 = 1;

/// Settings that affect indexing and are included in the config hash.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct IndexingConfig {
    /// Schema version - changes when index structure changes.
    pub schema_version: u32,
    /// Stemmer language for text analysis.
    pub stemmer: String,
    /// Dataset name.
    pub dataset: String,
    /// Selected categories, in configured order.
    pub categories: Vec<String>,
    /// Meta link types, in configured order.
    pub meta_link_types: Vec<String>,
    /// Review and Q&A entries rendered per document.
    pub max_entries: usize,
    /// Whether relations are traversable in both directions.
    pub indirected: bool,
}

impl IndexingConfig {
    /// Extracts indexing-relevant settings from a config.
    pub fn from_config(config: &Config) -> Self {
        let dataset = &config.dataset;
        Self {
            schema_version: SCHEMA_VERSION,
            stemmer: config.search.stemmer.to_lowercase(),
            dataset: dataset.name.clone(),
            categories: dataset.categories.clone(),
            meta_link_types: dataset.meta_link_types.clone(),
            max_entries: dataset.max_entries,
            indirected: dataset.indirected,
        }
    }

    /// Computes a 64-bit hash of the indexing configuration.
    pub fn compute_hash(&self) -> u64 {
        let mut hasher = SipHasher24::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Computes a hash and returns it as a hex string.
    pub fn hash_string(&self) -> String {
        format!("{:016x}", self.compute_hash())
    }
}

/// Computes a config hash from a Config.
pub fn compute_config_hash(config: &Config) -> String {
    IndexingConfig::from_config(config).hash_string()
}

#[cfg(test)]
mod tests {
    use stark_config::{DatasetSettings, SearchSettings};

    use super::*;

    /// Config with modified dataset settings.
    fn with_dataset(update: impl FnOnce(&mut DatasetSettings)) -> Config {
        let mut config = Config::default();
        update(&mut config.dataset);
        config
    }

    #[test]
    fn same_config_produces_same_hash() {
        assert_eq!(
            compute_config_hash(&Config::default()),
            compute_config_hash(&Config::default())
        );
    }

    #[test]
    fn stemmer_case_does_not_matter() {
        let upper = Config {
            search: SearchSettings {
                stemmer: "English".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            compute_config_hash(&upper),
            compute_config_hash(&Config::default())
        );
    }

    #[test]
    fn different_stemmer_produces_different_hash() {
        let french = Config {
            search: SearchSettings {
                stemmer: "french".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_ne!(
            compute_config_hash(&french),
            compute_config_hash(&Config::default())
        );
    }

    #[test]
    fn dataset_settings_change_hash() {
        let base = compute_config_hash(&Config::default());
        let changed = [
            with_dataset(|d| d.categories = vec!["Automotive".into()]),
            with_dataset(|d| d.meta_link_types = vec!["brand".into(), "category".into()]),
            with_dataset(|d| d.max_entries = 5),
            with_dataset(|d| d.indirected = false),
            with_dataset(|d| d.name = "prime".into()),
        ];
        for config in &changed {
            assert_ne!(compute_config_hash(config), base, "{:?}", config.dataset);
        }
    }

    #[test]
    fn search_limit_does_not_change_hash() {
        let config = Config {
            search: SearchSettings {
                limit: 3,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            compute_config_hash(&config),
            compute_config_hash(&Config::default())
        );
    }

    #[test]
    fn hash_is_hex_string() {
        let hash = compute_config_hash(&Config::default());
        assert_eq!(hash.len(), 16);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
