//! HTTP client for listing pages and file transfers
//!
//! The crawler only depends on two capabilities, [`LinkSource`] and
//! [`FileTransport`]. [`ListingClient`] implements both over HTTP:
//! - `config`: HTTP client configuration and building
//! - `http`: rate-limited GET requests
//! - `download`: streaming downloads with atomic writes

use std::path::Path;

use async_trait::async_trait;
use url::Url;

use crate::app::links::extract_links;
use crate::errors::TransportResult;

pub mod config;
pub mod download;
pub mod http;

pub use config::ClientConfig;

use download::DownloadHandler;
use http::HttpHandler;

/// Something that can list the hyperlink targets of a page
#[async_trait]
pub trait LinkSource {
    /// Fetch `url` and return its hyperlink targets in document order
    async fn fetch_links(&self, url: &Url) -> TransportResult<Vec<String>>;
}

/// Something that can copy a remote file to a local path
#[async_trait]
pub trait FileTransport {
    /// Fetch `url` into `destination`, returning the number of bytes written
    async fn fetch_to_file(&self, url: &Url, destination: &Path) -> TransportResult<u64>;
}

#[async_trait]
impl<T: LinkSource + Sync + ?Sized> LinkSource for &T {
    async fn fetch_links(&self, url: &Url) -> TransportResult<Vec<String>> {
        (**self).fetch_links(url).await
    }
}

#[async_trait]
impl<T: FileTransport + Sync + ?Sized> FileTransport for &T {
    async fn fetch_to_file(&self, url: &Url, destination: &Path) -> TransportResult<u64> {
        (**self).fetch_to_file(url, destination).await
    }
}

/// HTTP client for directory-listing hosts
#[derive(Debug)]
pub struct ListingClient {
    http_handler: HttpHandler,
}

impl ListingClient {
    /// Creates a client with default settings
    pub fn new() -> TransportResult<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Creates a client with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the HTTP client or rate limiter cannot be built
    pub fn with_config(config: &ClientConfig) -> TransportResult<Self> {
        let client = config.build_http_client()?;
        let http_handler = HttpHandler::new(client, config.rate_limit_rps)?;
        tracing::debug!(
            "Created listing client ({} rps, timeout {:?})",
            config.rate_limit_rps,
            config.request_timeout
        );
        Ok(Self { http_handler })
    }

    /// Fetches the HTML content of a page
    pub async fn get_page(&self, url: &Url) -> TransportResult<String> {
        self.http_handler.get_page(url).await
    }
}

#[async_trait]
impl LinkSource for ListingClient {
    async fn fetch_links(&self, url: &Url) -> TransportResult<Vec<String>> {
        let html = self.get_page(url).await?;
        let links = extract_links(&html);
        tracing::debug!("Extracted {} links from {}", links.len(), url);
        Ok(links)
    }
}

#[async_trait]
impl FileTransport for ListingClient {
    async fn fetch_to_file(&self, url: &Url, destination: &Path) -> TransportResult<u64> {
        DownloadHandler::new(&self.http_handler)
            .download_file(url, destination)
            .await
    }
}
