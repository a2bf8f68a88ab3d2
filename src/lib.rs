//! File Stockpiler Library
//!
//! Crawls a directory-listing page, filters its links by extension, skips
//! files that already exist locally under any of a set of alternate
//! extensions, and downloads the rest one at a time, logging failures.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
