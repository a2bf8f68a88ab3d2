//! Per-file resolution and transfer
//!
//! Each selected link is resolved against the listing page URL and fetched
//! into the output directory. Failures are written to the failure log and
//! counted; they never stop the run.

use std::path::{Path, PathBuf};

use tracing::{error, info};
use url::Url;

use crate::app::client::FileTransport;
use crate::app::crawler::progress::CrawlObserver;
use crate::app::crawler::stats::RunSummary;
use crate::app::failures::{FailureLog, FailureRecord};
use crate::app::filter::bare_filename;
use crate::app::selector::decode_link;
use crate::errors::{FetchError, FetchResult};

/// Resolve a link found on `base`
///
/// Absolute links are used as-is; anything else is joined onto `base`.
pub fn resolve_link(base: &Url, link: &str) -> FetchResult<Url> {
    match Url::parse(link) {
        Ok(url) => Ok(url),
        Err(_) => base.join(link).map_err(|_| FetchError::InvalidLinkUrl {
            link: link.to_string(),
        }),
    }
}

/// Local filename for a resolved URL: its decoded last path segment
pub fn local_file_name(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.last()?;
    let decoded = decode_link(segment);
    let name = decoded.rsplit(['/', '\\']).next().unwrap_or_default();
    match name {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// A completed transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    pub url: Url,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Fetches selected links one at a time
pub struct FetchOrchestrator<'a, T: FileTransport + ?Sized> {
    transport: &'a T,
    base_url: &'a Url,
    output_dir: &'a Path,
    failure_log: &'a FailureLog,
    total: usize,
    attempts: usize,
}

impl<'a, T: FileTransport + ?Sized> FetchOrchestrator<'a, T> {
    pub fn new(
        transport: &'a T,
        base_url: &'a Url,
        output_dir: &'a Path,
        failure_log: &'a FailureLog,
        total: usize,
    ) -> Self {
        Self {
            transport,
            base_url,
            output_dir,
            failure_log,
            total,
            attempts: 0,
        }
    }

    /// Transfers attempted so far
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Resolve and fetch one link, updating `summary`
    ///
    /// Errors are already recorded in the failure log and the summary when
    /// this returns; callers only need them for reporting.
    pub async fn process(
        &mut self,
        link: &str,
        summary: &mut RunSummary,
        observer: &mut dyn CrawlObserver,
    ) -> FetchResult<FetchedFile> {
        match self.fetch(link, observer).await {
            Ok(fetched) => {
                summary.record_downloaded();
                Ok(fetched)
            }
            Err(e) => {
                summary.record_failed();
                self.record_failure(link, &e, observer).await;
                Err(e)
            }
        }
    }

    async fn fetch(
        &mut self,
        link: &str,
        observer: &mut dyn CrawlObserver,
    ) -> FetchResult<FetchedFile> {
        let url = resolve_link(self.base_url, link)?;
        let file_name = local_file_name(&url).ok_or_else(|| FetchError::InvalidLinkUrl {
            link: link.to_string(),
        })?;

        self.attempts += 1;
        observer.download_started(self.attempts, self.total, &file_name);

        let path = self.output_dir.join(&file_name);
        let bytes = self
            .transport
            .fetch_to_file(&url, &path)
            .await
            .map_err(|source| FetchError::DownloadFailed {
                url: url.to_string(),
                source,
            })?;

        Ok(FetchedFile { url, path, bytes })
    }

    async fn record_failure(
        &self,
        link: &str,
        error: &FetchError,
        observer: &mut dyn CrawlObserver,
    ) {
        let name = match bare_filename(link) {
            "" => link,
            name => name,
        };
        let record = FailureRecord::from_fetch_error(name, error);
        info!("{}", record);
        observer.download_failed(&record);

        if let Err(e) = self.failure_log.record(&record).await {
            error!("{}", e);
        }
    }
}
