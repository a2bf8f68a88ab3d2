//! Crawl progress events
//!
//! The crawler reports what it is doing through [`CrawlObserver`]. The CLI
//! renders these events on the console; library users and tests can plug in
//! their own observer or use [`NoopObserver`].

use url::Url;

use crate::app::crawler::stats::RunSummary;
use crate::app::failures::FailureRecord;

/// Receives progress events from a crawl; every method defaults to a no-op
pub trait CrawlObserver: Send {
    /// The listing page is about to be fetched
    fn page_loading(&mut self, _url: &Url) {}

    /// The listing page was fetched and parsed
    fn page_loaded(&mut self, _link_count: usize) {}

    /// The local inventory is about to be scanned
    fn inventory_scanning(&mut self) {}

    /// Candidate selection finished
    fn selection_complete(&mut self, _summary: &RunSummary) {}

    /// A selected file is listed during a dry run
    fn would_download(&mut self, _link: &str) {}

    /// A transfer is about to start; `attempt` is 1-based
    fn download_started(&mut self, _attempt: usize, _total: usize, _file_name: &str) {}

    /// A file could not be fetched
    fn download_failed(&mut self, _record: &FailureRecord) {}

    /// All selected files have been handled
    fn finished(&mut self, _summary: &RunSummary) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CrawlObserver for NoopObserver {}

/// Progress line printed before each transfer
pub fn download_line(attempt: usize, total: usize, file_name: &str) -> String {
    format!("{}/{} Downloading {}...", attempt, total, file_name)
}
