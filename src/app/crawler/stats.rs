//! Run counters

use std::fmt;

/// Counters accumulated over one crawl
///
/// Every counter only ever increases during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Links whose extension is in the download formats
    pub found: usize,
    /// Candidates with no local equivalent
    pub to_download: usize,
    /// Successful transfers
    pub downloaded: usize,
    /// Unresolvable links plus failed transfers
    pub failed: usize,
}

impl RunSummary {
    pub fn record_found(&mut self) {
        self.found += 1;
    }

    pub fn record_needed(&mut self) {
        self.to_download += 1;
    }

    pub fn record_downloaded(&mut self) {
        self.downloaded += 1;
    }

    pub fn record_failed(&mut self) {
        self.failed += 1;
    }

    /// Candidates that already had a local equivalent
    pub fn skipped(&self) -> usize {
        self.found.saturating_sub(self.to_download)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found: {} | Skipped: {} | Downloaded: {} | Fails: {}",
            self.found,
            self.skipped(),
            self.downloaded,
            self.failed
        )
    }
}
