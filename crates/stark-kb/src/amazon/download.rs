//! Downloading of the raw Amazon dumps.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::blocking::Client;
pub use stark_config::{DEFAULT_QA_BASE, DEFAULT_REVIEW_BASE};
use tracing::{debug, info};

use super::categories::CategorySelection;
use crate::error::KbError;

/// Where the raw dumps are fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSource {
    /// Base URL of the review and metadata dumps.
    pub review_base: String,
    /// Base URL of the Q&A dumps.
    pub qa_base: String,
}

impl Default for DownloadSource {
    fn default() -> Self {
        Self {
            review_base: DEFAULT_REVIEW_BASE.to_string(),
            qa_base: DEFAULT_QA_BASE.to_string(),
        }
    }
}

/// A raw file to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    /// Source URL.
    pub url: String,
    /// File name inside the raw directory.
    pub file_name: String,
}

/// Lists the files needed for a category selection.
///
/// Review categories need `categoryFiles/<C>.json.gz` and `metaFiles2/meta_<C>.json.gz` under
/// the review base; Q&A categories need `qa_<C>.json.gz` under the Q&A base.
pub fn raw_file_urls(source: &DownloadSource, selection: &CategorySelection) -> Vec<RawFile> {
    let review_base = source.review_base.trim_end_matches('/');
    let qa_base = source.qa_base.trim_end_matches('/');
    let mut files = Vec::new();
    for category in &selection.review {
        files.push(RawFile {
            url: format!("{review_base}/categoryFiles/{category}.json.gz"),
            file_name: format!("{category}.json.gz"),
        });
        files.push(RawFile {
            url: format!("{review_base}/metaFiles2/meta_{category}.json.gz"),
            file_name: format!("meta_{category}.json.gz"),
        });
    }
    for category in &selection.qa {
        files.push(RawFile {
            url: format!("{qa_base}/qa_{category}.json.gz"),
            file_name: format!("qa_{category}.json.gz"),
        });
    }
    files
}

/// Downloads every missing raw file into `raw_dir` and returns the number fetched.
///
/// Files are streamed to a `.part` sibling and renamed into place once complete, so an
/// interrupted download is retried on the next run.
pub fn fetch_raw(
    source: &DownloadSource,
    selection: &CategorySelection,
    raw_dir: &Path,
) -> Result<usize, KbError> {
    let missing: Vec<RawFile> = raw_file_urls(source, selection)
        .into_iter()
        .filter(|f| !raw_dir.join(&f.file_name).exists())
        .collect();
    if missing.is_empty() {
        debug!(dir = %raw_dir.display(), "raw files already present");
        return Ok(0);
    }

    fs::create_dir_all(raw_dir).map_err(|e| KbError::io(raw_dir, e))?;
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .timeout(None)
        .build()
        .map_err(|e| KbError::Download {
            url: String::new(),
            message: e.to_string(),
        })?;

    for file in &missing {
        let target = raw_dir.join(&file.file_name);
        info!(url = %file.url, "downloading");
        download_to(&client, &file.url, &target)?;
    }
    Ok(missing.len())
}

/// Streams `url` into `target` through a `.part` file.
fn download_to(client: &Client, url: &str, target: &Path) -> Result<(), KbError> {
    let download_error = |e: reqwest::Error| KbError::Download {
        url: url.to_string(),
        message: e.to_string(),
    };
    let mut response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(download_error)?;

    let partial = part_path(target);
    let file = File::create(&partial).map_err(|e| KbError::io(&partial, e))?;
    let mut writer = BufWriter::new(file);
    let bytes = io::copy(&mut response, &mut writer).map_err(|e| KbError::io(&partial, e))?;
    writer.flush().map_err(|e| KbError::io(&partial, e))?;
    fs::rename(&partial, target).map_err(|e| KbError::io(target, e))?;
    debug!(path = %target.display(), bytes, "downloaded");
    Ok(())
}

/// The in-progress path for a download target.
fn part_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    target.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amazon::categories::resolve_categories;

    #[test]
    fn urls_for_selection() {
        let source = DownloadSource {
            review_base: "http://mirror/amazon_v2/".into(),
            qa_base: "http://mirror/qa".into(),
        };
        let selection = resolve_categories(&["Automotive"]).unwrap();
        let urls: Vec<String> = raw_file_urls(&source, &selection)
            .into_iter()
            .map(|f| f.url)
            .collect();
        assert_eq!(
            urls,
            vec![
                "http://mirror/amazon_v2/categoryFiles/Automotive.json.gz",
                "http://mirror/amazon_v2/metaFiles2/meta_Automotive.json.gz",
                "http://mirror/qa/qa_Automotive.json.gz",
            ]
        );
    }

    #[test]
    fn all_selection_lists_every_dump() {
        let selection = resolve_categories(&["all"]).unwrap();
        let files = raw_file_urls(&DownloadSource::default(), &selection);
        assert_eq!(files.len(), 29 * 2 + 19);
        assert!(files.iter().all(|f| f.url.starts_with("https://")));
    }

    #[test]
    fn existing_files_are_not_fetched() {
        let dir = tempfile::tempdir().unwrap();
        let source = DownloadSource {
            // Unroutable; any request would fail the test.
            review_base: "http://127.0.0.1:9".into(),
            qa_base: "http://127.0.0.1:9".into(),
        };
        let selection = resolve_categories(&["Automotive"]).unwrap();
        for file in raw_file_urls(&source, &selection) {
            fs::write(dir.path().join(file.file_name), b"").unwrap();
        }
        assert_eq!(fetch_raw(&source, &selection, dir.path()).unwrap(), 0);
    }

    #[test]
    fn failed_download_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = DownloadSource {
            review_base: "http://127.0.0.1:9".into(),
            qa_base: "http://127.0.0.1:9".into(),
        };
        let selection = resolve_categories(&["Automotive"]).unwrap();
        let err = fetch_raw(&source, &selection, dir.path()).unwrap_err();
        assert!(matches!(err, KbError::Download { .. }));
        assert!(!dir.path().join("Automotive.json.gz").exists());
    }

    #[test]
    fn part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("/raw/qa_Baby.json.gz")),
            PathBuf::from("/raw/qa_Baby.json.gz.part")
        );
    }
}
