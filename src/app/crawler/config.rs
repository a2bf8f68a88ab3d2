//! Runtime configuration for a crawl

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app::filter::ExtensionMatching;
use crate::constants::files;

/// Everything a single crawl needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Absolute URL of the listing page
    pub target_url: String,
    /// Extensions to download (order does not matter)
    pub download_formats: Vec<String>,
    /// Extensions to look for locally, in priority order
    pub check_formats: Vec<String>,
    /// Extension comparison mode
    pub extension_matching: ExtensionMatching,
    /// Root of the local inventory scan
    pub inventory_root: PathBuf,
    /// Directory downloaded files are written to
    pub output_dir: PathBuf,
    /// Directory the failure log is written to
    pub failure_log_dir: PathBuf,
    /// Base name of the failure log
    pub failure_log_name: String,
    /// List selected files without fetching them
    pub dry_run: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            target_url: String::new(),
            download_formats: Vec::new(),
            check_formats: Vec::new(),
            extension_matching: ExtensionMatching::default(),
            inventory_root: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            failure_log_dir: PathBuf::from("."),
            failure_log_name: files::FAILURE_LOG_NAME.to_string(),
            dry_run: false,
        }
    }
}

impl CrawlerConfig {
    /// Config rooted at a single working directory
    pub fn in_directory(target_url: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            target_url: target_url.into(),
            inventory_root: dir.clone(),
            output_dir: dir.clone(),
            failure_log_dir: dir,
            ..Default::default()
        }
    }

    pub fn with_download_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.download_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_check_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.check_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extension_matching(mut self, matching: ExtensionMatching) -> Self {
        self.extension_matching = matching;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
