//! Core application logic for File Stockpiler
//!
//! This module contains the crawl pipeline: link extraction and filtering,
//! the local inventory, download selection, the HTTP client, the failure log,
//! and the crawler that ties them together.
//!
//! # Examples
//!
//! ```rust,no_run
//! use file_stockpiler::app::{Crawler, CrawlerConfig, ListingClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CrawlerConfig::in_directory("https://example.org/roms/", ".")
//!     .with_download_formats(["zip"])
//!     .with_check_formats(["zip", "chd"]);
//!
//! let mut crawler = Crawler::new(config, ListingClient::new()?, ListingClient::new()?)?;
//! let summary = crawler.run().await?;
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod crawler;
pub mod failures;
pub mod filter;
pub mod inventory;
pub mod links;
pub mod selector;

// Re-export main public API
pub use client::{ClientConfig, FileTransport, LinkSource, ListingClient};
pub use crawler::{
    parse_target_url, resolve_link, CrawlObserver, Crawler, CrawlerConfig, NoopObserver,
    RunSummary, SelectionOutcome,
};
pub use failures::{FailureLog, FailureRecord};
pub use filter::{ExtensionMatching, LinkFilter};
pub use inventory::{InventoryIndex, InventorySnapshot};
pub use links::extract_links;
pub use selector::{DownloadSelector, Selection};
