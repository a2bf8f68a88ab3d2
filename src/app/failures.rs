//! Append-only failure log
//!
//! The log filename is chosen once per run by probing `fails.txt`,
//! `fails1.txt`, `fails2.txt`, ... until an unused name is found. The file is
//! only created when the first failure is recorded.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::constants::files;
use crate::errors::{FailureLogError, FetchError};

/// One failed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    /// Filename as it appeared in the link
    pub file_name: String,
    /// Short reason text
    pub reason: String,
    /// Raw underlying error, if any
    pub detail: Option<String>,
}

impl FailureRecord {
    pub fn new(file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            reason: reason.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Build a record from a per-file fetch error
    pub fn from_fetch_error(file_name: impl Into<String>, error: &FetchError) -> Self {
        Self {
            file_name: file_name.into(),
            reason: error.reason().to_string(),
            detail: error.detail(),
        }
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] details: \"{}\"", self.file_name, self.reason)?;
        if let Some(detail) = &self.detail {
            write!(f, " {}", detail)?;
        }
        Ok(())
    }
}

/// Candidate log name for a given probe index; index 0 is the base name
pub fn numbered_name(base: &str, index: usize) -> String {
    if index == 0 {
        return base.to_string();
    }
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}{}.{}", stem, index, ext),
        _ => format!("{}{}", base, index),
    }
}

/// Failure log with a collision-free filename
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    /// Pick the first unused log name in `dir`
    pub fn select(dir: &Path, base_name: &str) -> Result<Self, FailureLogError> {
        if base_name.trim().is_empty() || base_name.contains(['/', '\\']) {
            return Err(FailureLogError::InvalidName {
                name: base_name.to_string(),
            });
        }

        let path = (0..)
            .map(|index| dir.join(numbered_name(base_name, index)))
            .find(|candidate| !candidate.exists())
            .unwrap_or_else(|| dir.join(base_name));

        debug!("Failure log set to {}", path.display());
        Ok(Self { path })
    }

    /// Select using the default base name
    pub fn select_default(dir: &Path) -> Result<Self, FailureLogError> {
        Self::select(dir, files::FAILURE_LOG_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether anything has been written yet
    pub fn has_entries(&self) -> bool {
        self.path.exists()
    }

    /// Append one record as a `\r\n`-terminated line
    pub async fn record(&self, record: &FailureRecord) -> Result<(), FailureLogError> {
        let line = format!("{}{}", record, files::FAILURE_LOG_LINE_ENDING);
        self.append(line.as_bytes()).await
    }

    async fn append(&self, bytes: &[u8]) -> Result<(), FailureLogError> {
        let map_err = |source| FailureLogError::Write {
            path: self.path.clone(),
            source,
        };

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(map_err)?;
        file.write_all(bytes).await.map_err(map_err)?;
        file.flush().await.map_err(map_err)?;
        Ok(())
    }
}
