//! Configuration management for File Stockpiler
//!
//! Saved options live in a TOML file under the user config directory. Values
//! are layered: defaults, then the config file, then command-line overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::crawler::parse_target_url;
use crate::app::{ClientConfig, CrawlerConfig, ExtensionMatching};
use crate::constants::{config as config_constants, files, http, limits};
use crate::errors::{ConfigError, ConfigResult};

/// Persisted application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Absolute URL of the listing page
    pub target_url: String,
    /// Extensions to download
    pub download_file_formats: Vec<String>,
    /// Extensions to look for locally, in priority order
    pub local_check_file_formats: Vec<String>,
    /// Extension comparison mode
    pub extension_matching: ExtensionMatching,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Failure log settings
    pub failure_log: FailureLogConfig,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
    /// Override the user agent
    pub user_agent: Option<String>,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
            user_agent: None,
        }
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| http::USER_AGENT.to_string()),
            rate_limit_rps: self.rate_limit_rps,
        }
    }
}

/// Failure log settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureLogConfig {
    /// Base filename; numeric suffixes are added when it already exists
    pub file_name: String,
}

impl Default for FailureLogConfig {
    fn default() -> Self {
        Self {
            file_name: files::FAILURE_LOG_NAME.to_string(),
        }
    }
}

/// Split a comma-separated list of extensions
///
/// Entries are trimmed and lose any leading dot; empty entries are dropped.
pub fn parse_format_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|entry| entry.trim().trim_start_matches('.').trim())
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize_formats(formats: &[String]) -> Vec<String> {
    formats
        .iter()
        .flat_map(|entry| parse_format_list(entry))
        .collect()
}

impl AppConfig {
    /// Load configuration from the override path or the default location
    ///
    /// A missing default file yields defaults; a missing explicit file is an error.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let path = Self::resolve_path(config_file_override.as_deref())?;

        if path.exists() {
            debug!("Loading config from: {}", path.display());
            Self::load_from_file(&path).await
        } else if config_file_override.is_some() {
            Err(ConfigError::NotFound { path })
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Path used for loading and saving
    pub fn resolve_path(config_file_override: Option<&Path>) -> ConfigResult<PathBuf> {
        match config_file_override {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_config_path(),
        }
    }

    /// Get the default config file path for the current user
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir
            .join(config_constants::APP_DIR_NAME)
            .join(config_constants::FILE_NAME))
    }

    /// Load configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config: AppConfig = toml::from_str(&content)?;
        config.normalize();

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Write the configuration as TOML, creating parent directories
    pub async fn save(&self, path: &Path) -> ConfigResult<()> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(path, content).await.map_err(io_err)?;

        info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Delete a saved configuration; returns whether a file was removed
    pub async fn remove(path: &Path) -> ConfigResult<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Trim format entries, strip leading dots, and drop empties
    pub fn normalize(&mut self) {
        self.target_url = self.target_url.trim().to_string();
        self.download_file_formats = normalize_formats(&self.download_file_formats);
        self.local_check_file_formats = normalize_formats(&self.local_check_file_formats);
    }

    /// Check that the configuration is ready for a crawl
    pub fn validate(&self) -> ConfigResult<()> {
        if self.target_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "target_url".to_string(),
            });
        }
        if let Err(e) = parse_target_url(&self.target_url) {
            return Err(ConfigError::InvalidValue {
                field: "target_url".to_string(),
                value: self.target_url.clone(),
                reason: e.to_string(),
            });
        }
        if self.download_file_formats.is_empty() {
            return Err(ConfigError::MissingField {
                field: "download_file_formats".to_string(),
            });
        }
        if self.local_check_file_formats.is_empty() {
            return Err(ConfigError::MissingField {
                field: "local_check_file_formats".to_string(),
            });
        }
        if self.client.rate_limit_rps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "client.rate_limit_rps".to_string(),
                value: "0".to_string(),
                reason: "Rate limit must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Names of crawl fields that are still empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.target_url.is_empty() {
            missing.push("target_url");
        }
        if self.download_file_formats.is_empty() {
            missing.push("download_file_formats");
        }
        if self.local_check_file_formats.is_empty() {
            missing.push("local_check_file_formats");
        }
        missing
    }

    /// Build a crawler configuration working in `dir`
    pub fn crawler_config(&self, dir: impl Into<PathBuf>) -> CrawlerConfig {
        CrawlerConfig {
            download_formats: self.download_file_formats.clone(),
            check_formats: self.local_check_file_formats.clone(),
            extension_matching: self.extension_matching,
            failure_log_name: self.failure_log.file_name.clone(),
            ..CrawlerConfig::in_directory(self.target_url.clone(), dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn complete_config() -> AppConfig {
        AppConfig {
            target_url: "http://host/roms/".to_string(),
            download_file_formats: vec!["zip".to_string()],
            local_check_file_formats: vec!["zip".to_string(), "chd".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_format_list() {
        assert_eq!(parse_format_list("zip, .chd ,7z,,"), vec!["zip", "chd", "7z"]);
        assert!(parse_format_list("  ").is_empty());
        assert_eq!(parse_format_list("zip"), vec!["zip"]);
    }

    #[test]
    fn test_default_config_is_incomplete() {
        let config = AppConfig::default();
        assert_eq!(
            config.missing_fields(),
            vec!["target_url", "download_file_formats", "local_check_file_formats"]
        );
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { .. })
        ));
        assert_eq!(config.failure_log.file_name, "fails.txt");
    }

    #[test]
    fn test_validate_rejects_relative_url() {
        let config = AppConfig {
            target_url: "host/roms".to_string(),
            ..complete_config()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(complete_config().validate().is_ok());
    }

    #[test]
    fn test_normalize_cleans_formats() {
        let mut config = AppConfig {
            target_url: "  http://host/  ".to_string(),
            download_file_formats: vec![" .zip".to_string(), "".to_string()],
            local_check_file_formats: vec!["zip,chd".to_string()],
            ..Default::default()
        };
        config.normalize();
        assert_eq!(config.target_url, "http://host/");
        assert_eq!(config.download_file_formats, vec!["zip"]);
        assert_eq!(config.local_check_file_formats, vec!["zip", "chd"]);
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = AppConfig {
            extension_matching: ExtensionMatching::CaseInsensitive,
            ..complete_config()
        };
        config.save(&path).await.unwrap();

        let loaded = AppConfig::load(Some(path)).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_load_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        tokio::fs::write(
            &path,
            r#"
target_url = "http://host/roms/"
download_file_formats = ["zip"]
local_check_file_formats = ["zip", "chd"]

[client]
rate_limit_rps = 2
"#,
        )
        .await
        .unwrap();

        let config = AppConfig::load(Some(path)).await.unwrap();
        assert_eq!(config.client.rate_limit_rps, 2);
        assert_eq!(
            config.client.request_timeout_secs,
            http::DEFAULT_TIMEOUT.as_secs()
        );
        assert_eq!(config.extension_matching, ExtensionMatching::CaseSensitive);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_missing_explicit_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = AppConfig::load(Some(temp_dir.path().join("nope.toml"))).await;
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_load_invalid_toml_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        tokio::fs::write(&path, "target_url = [").await.unwrap();

        let result = AppConfig::load(Some(path)).await;
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn test_remove_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        complete_config().save(&path).await.unwrap();

        assert!(AppConfig::remove(&path).await.unwrap());
        assert!(!AppConfig::remove(&path).await.unwrap());
    }

    #[test]
    fn test_crawler_config_conversion() {
        let config = complete_config();
        let crawler = config.crawler_config("/data");
        assert_eq!(crawler.target_url, "http://host/roms/");
        assert_eq!(crawler.check_formats, vec!["zip", "chd"]);
        assert_eq!(crawler.inventory_root, PathBuf::from("/data"));
        assert_eq!(crawler.failure_log_name, "fails.txt");
    }

    #[test]
    fn test_client_config_conversion() {
        let client = ClientConfigToml {
            request_timeout_secs: 12,
            user_agent: Some("custom".to_string()),
            ..Default::default()
        };
        let runtime = client.to_runtime_config();
        assert_eq!(runtime.request_timeout, Duration::from_secs(12));
        assert_eq!(runtime.user_agent, "custom");
    }
}
