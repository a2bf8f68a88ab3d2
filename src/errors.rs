//! Error types for File Stockpiler
//!
//! Errors are split by concern. Pre-flight failures (bad target URL, page
//! load, unreadable inventory root) abort the run; per-file failures are
//! recorded to the failure log and the run continues.

use std::path::PathBuf;
use thiserror::Error;

/// Transport-level errors raised by the HTTP client
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status
    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    /// I/O error while writing the response body
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Temp file could not be moved into place
    #[error("Could not rename {temp_path} to {final_path}")]
    RenameFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
    },

    /// Client construction or rate limiter setup failed
    #[error("HTTP client setup failed: {reason}")]
    ClientSetup { reason: String },
}

/// Errors that abort a crawl before any download starts
#[derive(Error, Debug)]
pub enum CrawlError {
    /// The configured target URL is not an absolute URL
    #[error("Invalid url: {url} - {error}")]
    InvalidTargetUrl { url: String, error: String },

    /// The listing page could not be fetched or parsed
    #[error("Pre-setup failed: could not load {url}")]
    PageLoadFailed {
        url: String,
        #[source]
        source: TransportError,
    },
}

/// Per-file errors; these are recorded and never abort the run
#[derive(Error, Debug)]
pub enum FetchError {
    /// The link could not be resolved to a URL
    #[error("invalid file url")]
    InvalidLinkUrl { link: String },

    /// The transfer itself failed
    #[error("download failed")]
    DownloadFailed {
        url: String,
        #[source]
        source: TransportError,
    },
}

impl FetchError {
    /// Reason text written to the failure log
    pub fn reason(&self) -> &'static str {
        match self {
            FetchError::InvalidLinkUrl { .. } => "invalid file url",
            FetchError::DownloadFailed { .. } => "download failed",
        }
    }

    /// Raw underlying error, if any
    pub fn detail(&self) -> Option<String> {
        match self {
            FetchError::InvalidLinkUrl { .. } => None,
            FetchError::DownloadFailed { source, .. } => Some(source.to_string()),
        }
    }
}

/// Local inventory scan errors
#[derive(Error, Debug)]
pub enum InventoryError {
    /// The root of the scan could not be read
    #[error("Cannot scan directory {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The blocking scan task did not complete
    #[error("Directory scan task failed: {reason}")]
    ScanTaskFailed { reason: String },
}

/// Failure log errors
#[derive(Error, Debug)]
pub enum FailureLogError {
    /// Appending to the log file failed
    #[error("Cannot write failure log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The base filename has no usable stem
    #[error("Invalid failure log name: {name}")]
    InvalidName { name: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Configuration could not be serialized: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Reading or writing the configuration file failed
    #[error("Configuration file I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Missing required configuration field
    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// No user config directory on this platform
    #[error("Could not determine user config directory")]
    NoConfigDir,
}

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    FailureLog(#[from] FailureLogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Whether the error aborts a run before downloads begin
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AppError::Fetch(_))
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Crawl(_) => "crawl",
            AppError::Fetch(_) => "fetch",
            AppError::Transport(_) => "transport",
            AppError::Inventory(_) => "inventory",
            AppError::FailureLog(_) => "failure-log",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Crawl result type alias
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Transport result type alias
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Inventory result type alias
pub type InventoryResult<T> = std::result::Result<T, InventoryError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
