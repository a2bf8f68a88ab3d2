//! Console progress display
//!
//! Prints the crawl's progress lines to stdout. The page fetch and the
//! inventory scan show a spinner while they run when stderr is a terminal.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use url::Url;

use crate::app::crawler::{download_line, CrawlObserver, RunSummary};
use crate::app::failures::FailureRecord;

/// Console renderer for crawl events
pub struct ConsoleProgress {
    spinner: Option<ProgressBar>,
    show_spinner: bool,
    dry_run: bool,
}

impl ConsoleProgress {
    pub fn new(dry_run: bool) -> Self {
        Self {
            spinner: None,
            show_spinner: atty::is(atty::Stream::Stderr),
            dry_run,
        }
    }

    fn start_spinner(&mut self, message: String) {
        self.stop_spinner();
        if !self.show_spinner {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["◐", "◓", "◑", "◒"]),
        );
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(120));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl CrawlObserver for ConsoleProgress {
    fn page_loading(&mut self, url: &Url) {
        println!("Loading website data...");
        self.start_spinner(format!("Fetching {}", url));
    }

    fn page_loaded(&mut self, _link_count: usize) {
        self.stop_spinner();
        println!("Building file list...");
    }

    fn inventory_scanning(&mut self) {
        println!("Caching directory list...");
        self.start_spinner("Scanning local files...".to_string());
    }

    fn selection_complete(&mut self, summary: &RunSummary) {
        self.stop_spinner();
        println!(
            "Files found: {} / Need Download: {}",
            summary.found, summary.to_download
        );
    }

    fn would_download(&mut self, link: &str) {
        println!("  would download {}", link);
    }

    fn download_started(&mut self, attempt: usize, total: usize, file_name: &str) {
        println!("{}", download_line(attempt, total, file_name));
    }

    fn finished(&mut self, _summary: &RunSummary) {
        self.stop_spinner();
        if self.dry_run {
            println!("Dry run finished, nothing was downloaded.");
        } else {
            println!("Downloads Finished!");
        }
    }

    fn download_failed(&mut self, record: &FailureRecord) {
        tracing::debug!("Recorded failure for {}", record.file_name);
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}
