//! Crawl orchestration
//!
//! A crawl runs in two phases:
//!
//! 1. **Selection**: fetch the listing page, keep links whose extension is in
//!    the download formats, and drop those that already have a local
//!    equivalent under one of the check formats.
//! 2. **Download**: fetch the remaining links one at a time, writing failures
//!    to the failure log.
//!
//! Any error in the selection phase aborts the crawl before a single file is
//! fetched. Errors in the download phase are per-file and never abort.

use tracing::{debug, info};
use url::Url;

use crate::app::client::{FileTransport, LinkSource};
use crate::app::failures::FailureLog;
use crate::app::filter::LinkFilter;
use crate::app::inventory::InventoryIndex;
use crate::app::selector::{DownloadSelector, Selection};
use crate::errors::{ConfigError, CrawlError, Result};

pub mod config;
pub mod orchestrator;
pub mod progress;
pub mod stats;

pub use config::CrawlerConfig;
pub use orchestrator::{local_file_name, resolve_link, FetchOrchestrator, FetchedFile};
pub use progress::{download_line, CrawlObserver, NoopObserver};
pub use stats::RunSummary;

/// Parse the target URL; it must be absolute and able to serve as a base
pub fn parse_target_url(target: &str) -> std::result::Result<Url, CrawlError> {
    let url = Url::parse(target.trim()).map_err(|e| CrawlError::InvalidTargetUrl {
        url: target.to_string(),
        error: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(CrawlError::InvalidTargetUrl {
            url: target.to_string(),
            error: "URL cannot be used as a base for relative links".to_string(),
        });
    }
    Ok(url)
}

/// Result of the selection phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionOutcome {
    /// Links that need downloading, in page order
    pub selected: Vec<String>,
    /// Counters after selection
    pub summary: RunSummary,
}

/// Directory-listing crawler
pub struct Crawler<S, T> {
    config: CrawlerConfig,
    base_url: Url,
    link_filter: LinkFilter,
    inventory: InventoryIndex,
    source: S,
    transport: T,
    observer: Box<dyn CrawlObserver>,
    failure_log: Option<FailureLog>,
}

impl<S, T> Crawler<S, T>
where
    S: LinkSource,
    T: FileTransport,
{
    /// Validate `config` and build a crawler
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::InvalidTargetUrl` for a bad target and
    /// `ConfigError::MissingField` if either format list is empty
    pub fn new(config: CrawlerConfig, source: S, transport: T) -> Result<Self> {
        let base_url = parse_target_url(&config.target_url)?;

        if config.download_formats.is_empty() {
            return Err(ConfigError::MissingField {
                field: "download_file_formats".to_string(),
            }
            .into());
        }
        if config.check_formats.is_empty() {
            return Err(ConfigError::MissingField {
                field: "local_check_file_formats".to_string(),
            }
            .into());
        }

        let link_filter = LinkFilter::new(&config.download_formats, config.extension_matching);
        let inventory = InventoryIndex::new(&config.inventory_root, config.extension_matching);

        Ok(Self {
            config,
            base_url,
            link_filter,
            inventory,
            source,
            transport,
            observer: Box::new(NoopObserver),
            failure_log: None,
        })
    }

    /// Replace the progress observer
    pub fn with_observer(mut self, observer: Box<dyn CrawlObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn inventory(&self) -> &InventoryIndex {
        &self.inventory
    }

    /// Failure log chosen by the last download phase
    pub fn failure_log(&self) -> Option<&FailureLog> {
        self.failure_log.as_ref()
    }

    /// Fetch the listing and decide which links need downloading
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::PageLoadFailed` if the page cannot be fetched and
    /// `InventoryError` if the inventory root cannot be scanned
    pub async fn select(&mut self) -> Result<SelectionOutcome> {
        self.observer.page_loading(&self.base_url);
        let links = self
            .source
            .fetch_links(&self.base_url)
            .await
            .map_err(|source| CrawlError::PageLoadFailed {
                url: self.base_url.to_string(),
                source,
            })?;
        self.observer.page_loaded(links.len());
        info!("Loaded {} links from {}", links.len(), self.base_url);

        let selector = DownloadSelector::new(&self.inventory, &self.config.check_formats);
        let mut outcome = SelectionOutcome::default();

        for link in links {
            if !self.link_filter.is_candidate(&link) {
                continue;
            }
            outcome.summary.record_found();

            if !self.inventory.is_cached() {
                self.observer.inventory_scanning();
            }
            if let Selection::Needed = selector.select(&link).await? {
                outcome.summary.record_needed();
                outcome.selected.push(link);
            }
        }

        self.observer.selection_complete(&outcome.summary);
        info!(
            "Files found: {} / Need Download: {}",
            outcome.summary.found, outcome.summary.to_download
        );
        Ok(outcome)
    }

    /// Run a full crawl: selection, then sequential downloads
    ///
    /// # Errors
    ///
    /// Only selection-phase and failure-log setup errors are returned;
    /// per-file failures are counted in the summary instead
    pub async fn run(&mut self) -> Result<RunSummary> {
        let SelectionOutcome {
            selected,
            mut summary,
        } = self.select().await?;

        if self.config.dry_run {
            for link in &selected {
                self.observer.would_download(link);
            }
            self.observer.finished(&summary);
            return Ok(summary);
        }

        let failure_log =
            FailureLog::select(&self.config.failure_log_dir, &self.config.failure_log_name)?;

        let mut orchestrator = FetchOrchestrator::new(
            &self.transport,
            &self.base_url,
            &self.config.output_dir,
            &failure_log,
            summary.to_download,
        );

        for link in &selected {
            if let Ok(fetched) = orchestrator
                .process(link, &mut summary, self.observer.as_mut())
                .await
            {
                debug!("Saved {} to {}", fetched.url, fetched.path.display());
            }
        }

        debug!("{} transfers attempted", orchestrator.attempts());
        if failure_log.has_entries() {
            info!("Failures written to {}", failure_log.path().display());
        }
        self.failure_log = Some(failure_log);
        self.observer.finished(&summary);
        info!("Crawl finished: {}", summary);
        Ok(summary)
    }
}
