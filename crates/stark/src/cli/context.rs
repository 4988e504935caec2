//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use stark_config::Config;
use stark_index::{
    IndexError, IndexStats, IndexStatus, ProgressReporter, Searcher, SilentReporter, build_index,
    detect_index_status, index_directory,
};
use stark_kb::{DatasetOptions, DownloadSource, KnowledgeBase, load_dataset};
use tracing::debug;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
    /// Knowledge base loaded for this invocation.
    kb: Option<Box<dyn KnowledgeBase>>,
    /// Searcher opened for this invocation.
    searcher: Option<Searcher>,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self::new(cwd, config))
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init`, which should work even when an existing config file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self::new(cwd, Config::default()))
    }

    /// Context for `cwd` with an already loaded configuration.
    pub fn new(cwd: PathBuf, config: Config) -> Self {
        Self {
            cwd,
            config,
            kb: None,
            searcher: None,
        }
    }

    /// Dataset options derived from the configuration.
    ///
    /// Raw files are only downloaded when `download.enabled` is set.
    pub fn dataset_options(&self, force: bool) -> DatasetOptions {
        let dataset = &self.config.dataset;
        DatasetOptions {
            categories: dataset.categories.clone(),
            meta_link_types: dataset.meta_link_types.clone(),
            max_entries: dataset.max_entries,
            indirected: dataset.indirected,
            download: self
                .config
                .download
                .enabled
                .then(|| download_source(&self.config)),
            force,
        }
    }

    /// Returns the index directory, or fails when no config file anchors it.
    pub fn index_dir(&self) -> Result<PathBuf, ExitCode> {
        index_directory(&self.config).ok_or_else(|| {
            eprintln!("error: {}", IndexError::NoConfigRoot);
            ExitCode::FAILURE
        })
    }

    /// Returns the knowledge base, loading or building it on first use.
    pub fn kb(&mut self) -> Result<&dyn KnowledgeBase, ExitCode> {
        let kb = match self.kb.take() {
            Some(kb) => kb,
            None => load_kb_or_failure(&self.config, &self.dataset_options(false))?,
        };
        Ok(&**self.kb.insert(kb))
    }

    /// Rebuilds the index from the knowledge base.
    ///
    /// With `force`, processed data is discarded and the knowledge base is rebuilt from the
    /// raw files first.
    pub fn rebuild_index<R: ProgressReporter>(
        &mut self,
        force: bool,
        reporter: &mut R,
    ) -> Result<IndexStats, ExitCode> {
        let index_dir = self.index_dir()?;
        let options = self.dataset_options(force);
        let kb = match self.kb.take() {
            Some(kb) if !force => kb,
            _ => load_kb_or_failure(&self.config, &options)?,
        };
        let kb = self.kb.insert(kb);

        let stats = build_index(&**kb, &index_dir, &self.config, reporter).map_err(|e| {
            eprintln!("error: indexing failed: {e}");
            ExitCode::FAILURE
        })?;
        self.searcher = None;
        Ok(stats)
    }

    /// Returns a searcher, rebuilding the index first if it is missing or stale.
    pub fn searcher(&mut self) -> Result<&Searcher, ExitCode> {
        let searcher = match self.searcher.take() {
            Some(searcher) => searcher,
            None => self.open_fresh_searcher()?,
        };
        Ok(self.searcher.insert(searcher))
    }

    /// Ensures the index is current, then opens it.
    fn open_fresh_searcher(&mut self) -> Result<Searcher, ExitCode> {
        let index_dir = self.index_dir()?;
        let status = detect_index_status(&self.config);
        debug!(status = status.description(), "index status");
        if status.needs_rebuild() {
            eprintln!("{}", rebuild_notice(status));
            self.rebuild_index(false, &mut SilentReporter)?;
        }
        open_searcher_or_failure(&index_dir, &self.config.search.stemmer)
    }
}

/// Download source from the configuration.
pub fn download_source(config: &Config) -> DownloadSource {
    DownloadSource {
        review_base: config.download.review_base.clone(),
        qa_base: config.download.qa_base.clone(),
    }
}

/// Message printed before an automatic rebuild.
fn rebuild_notice(status: IndexStatus) -> String {
    match status {
        IndexStatus::Missing => "Index missing, building...".to_string(),
        _ => "Index needs rebuild, updating...".to_string(),
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}

/// Loads the configured dataset or exits with an error.
fn load_kb_or_failure(
    config: &Config,
    options: &DatasetOptions,
) -> Result<Box<dyn KnowledgeBase>, ExitCode> {
    load_dataset(&config.dataset.name, &config.dataset.root, options).map_err(|e| {
        eprintln!("error: failed to load knowledge base: {e}");
        ExitCode::FAILURE
    })
}

/// Opens the searcher, exiting with a consistent error on failure.
fn open_searcher_or_failure(index_dir: &Path, stemmer: &str) -> Result<Searcher, ExitCode> {
    Searcher::open(index_dir, stemmer).map_err(|e| {
        eprintln!("error: failed to open index: {e}");
        ExitCode::FAILURE
    })
}
