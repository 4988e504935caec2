//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues. Checks that
//! need dataset knowledge (category names, supported meta links) live with the dataset code.

use std::{collections::HashSet, fmt};

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The dataset directory does not exist and downloads are disabled.
    DatasetDirMissing {
        /// Directory that doesn't exist.
        path: String,
    },
    /// No categories are selected.
    NoCategories,
    /// `max_entries` is zero, so no reviews or Q&A would be rendered.
    ZeroMaxEntries,
    /// A meta link type is listed more than once.
    DuplicateMetaLinkType {
        /// The repeated link type.
        link_type: String,
    },
    /// A download base is not an HTTP(S) URL.
    InvalidDownloadUrl {
        /// Setting name.
        field: &'static str,
        /// Offending value.
        url: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DatasetDirMissing { path } => {
                write!(f, "dataset directory does not exist: {path}")
            }
            Self::NoCategories => write!(f, "no categories are selected"),
            Self::ZeroMaxEntries => {
                write!(f, "max_entries is 0; reviews and Q&A will not be rendered")
            }
            Self::DuplicateMetaLinkType { link_type } => {
                write!(f, "meta link type '{link_type}' is listed more than once")
            }
            Self::InvalidDownloadUrl { field, url } => {
                write!(f, "download.{field} is not an http(s) URL: {url}")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    let dataset = &config.dataset;

    let dataset_dir = config.dataset_dir();
    if !config.download.enabled && !dataset_dir.is_dir() {
        warnings.push(ConfigWarning::DatasetDirMissing {
            path: dataset_dir.display().to_string(),
        });
    }

    if dataset.categories.is_empty() {
        warnings.push(ConfigWarning::NoCategories);
    }

    if dataset.max_entries == 0 {
        warnings.push(ConfigWarning::ZeroMaxEntries);
    }

    let mut seen = HashSet::new();
    for link_type in &dataset.meta_link_types {
        if !seen.insert(link_type.as_str()) {
            warnings.push(ConfigWarning::DuplicateMetaLinkType {
                link_type: link_type.clone(),
            });
        }
    }

    for (field, url) in [
        ("review_base", &config.download.review_base),
        ("qa_base", &config.download.qa_base),
    ] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            warnings.push(ConfigWarning::InvalidDownloadUrl {
                field,
                url: url.clone(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestDir;

    /// A config whose dataset directory exists.
    fn config_with_dataset(test_dir: &TestDir) -> Config {
        let mut config = Config::default();
        config.dataset.root = test_dir.path().to_path_buf();
        test_dir.create_dir("amazon");
        config
    }

    #[test]
    fn test_valid_config_has_no_warnings() {
        let test_dir = TestDir::new();
        let config = config_with_dataset(&test_dir);
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn test_missing_dataset_dir() {
        let test_dir = TestDir::new();
        let mut config = Config::default();
        config.dataset.root = test_dir.path().join("nowhere");

        let warnings = validate_config(&config);
        assert!(matches!(
            warnings.as_slice(),
            [ConfigWarning::DatasetDirMissing { .. }]
        ));
    }

    #[test]
    fn test_missing_dataset_dir_ok_when_downloading() {
        let test_dir = TestDir::new();
        let mut config = Config::default();
        config.dataset.root = test_dir.path().join("nowhere");
        config.download.enabled = true;

        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn test_empty_categories_and_zero_entries() {
        let test_dir = TestDir::new();
        let mut config = config_with_dataset(&test_dir);
        config.dataset.categories.clear();
        config.dataset.max_entries = 0;

        let warnings = validate_config(&config);
        assert!(warnings.contains(&ConfigWarning::NoCategories));
        assert!(warnings.contains(&ConfigWarning::ZeroMaxEntries));
    }

    #[test]
    fn test_duplicate_meta_link() {
        let test_dir = TestDir::new();
        let mut config = config_with_dataset(&test_dir);
        config.dataset.meta_link_types = vec!["brand".into(), "category".into(), "brand".into()];

        let warnings = validate_config(&config);
        assert_eq!(
            warnings,
            vec![ConfigWarning::DuplicateMetaLinkType {
                link_type: "brand".into()
            }]
        );
    }

    #[test]
    fn test_invalid_download_url() {
        let test_dir = TestDir::new();
        let mut config = config_with_dataset(&test_dir);
        config.download.qa_base = "ftp://mirror/qa".into();

        let warnings = validate_config(&config);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("download.qa_base"));
    }
}
