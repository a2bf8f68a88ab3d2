//! Application constants for File Stockpiler
//!
//! Constants are grouped by functional domain.

use std::time::Duration;

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("File-Stockpiler/", env!("CARGO_PKG_VERSION"));

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Maximum number of redirects to follow
    pub const MAX_REDIRECTS: usize = 10;
}

/// Request pacing
pub mod limits {
    /// Default rate limit for requests to the listing host (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 5;
}

/// File naming constants
pub mod files {
    /// Base name of the failure log; numeric suffixes are inserted before the extension
    pub const FAILURE_LOG_NAME: &str = "fails.txt";

    /// Line terminator used by the failure log
    pub const FAILURE_LOG_LINE_ENDING: &str = "\r\n";

    /// Suffix appended to files while they are being downloaded
    pub const TEMP_FILE_SUFFIX: &str = ".part";
}

/// Format defaults offered when prompting
pub mod formats {
    /// Extensions downloaded when the user accepts the default
    pub const DEFAULT_DOWNLOAD_FORMATS: &[&str] = &["zip"];

    /// Extensions checked locally when the user accepts the default
    pub const DEFAULT_CHECK_FORMATS: &[&str] = &["zip", "chd"];
}

/// Configuration file locations
pub mod config {
    /// Directory under the user config dir
    pub const APP_DIR_NAME: &str = "file-stockpiler";

    /// Config file name
    pub const FILE_NAME: &str = "config.toml";
}

/// CSS selector for hyperlinks in a listing page
pub const LINK_SELECTOR: &str = "a[href]";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_formats() {
        assert_eq!(formats::DEFAULT_DOWNLOAD_FORMATS, &["zip"]);
        assert_eq!(formats::DEFAULT_CHECK_FORMATS, &["zip", "chd"]);
    }

    #[test]
    fn test_user_agent_has_version() {
        assert!(http::USER_AGENT.starts_with("File-Stockpiler/"));
        assert!(http::USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
