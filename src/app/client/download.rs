//! Streaming file downloads with atomic writes
//!
//! Bodies are streamed into `<name>.part` next to the destination and renamed
//! into place only after the last chunk is flushed. A failed transfer removes
//! the partial file, so a destination either holds a complete body or is
//! untouched.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::app::client::http::HttpHandler;
use crate::constants::files;
use crate::errors::{TransportError, TransportResult};

/// Temp path used while `destination` is being written
pub fn temp_path_for(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(files::TEMP_FILE_SUFFIX);
    destination.with_file_name(name)
}

/// File download operations handler
pub struct DownloadHandler<'a> {
    http_handler: &'a HttpHandler,
}

impl<'a> DownloadHandler<'a> {
    pub fn new(http_handler: &'a HttpHandler) -> Self {
        Self { http_handler }
    }

    /// Download `url` to `destination`
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request fails, the server answers with
    /// a non-success status, or the file cannot be written
    pub async fn download_file(&self, url: &Url, destination: &Path) -> TransportResult<u64> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = temp_path_for(destination);
        match self.download_to(url, &temp_path).await {
            Ok(bytes) => {
                tokio::fs::rename(&temp_path, destination)
                    .await
                    .map_err(|_| TransportError::RenameFailed {
                        temp_path: temp_path.clone(),
                        final_path: destination.to_path_buf(),
                    })?;
                tracing::info!("Downloaded {} ({} bytes)", destination.display(), bytes);
                Ok(bytes)
            }
            Err(e) => {
                if temp_path.exists() {
                    let _ = tokio::fs::remove_file(&temp_path).await;
                }
                tracing::debug!("Download of {} failed: {}", url, e);
                Err(e)
            }
        }
    }

    async fn download_to(&self, url: &Url, temp_path: &Path) -> TransportResult<u64> {
        let mut response = self.http_handler.get_response(url).await?;
        let mut file = File::create(temp_path).await?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_keeps_original_extension() {
        let temp = temp_path_for(Path::new("/tmp/game.zip"));
        assert_eq!(temp, PathBuf::from("/tmp/game.zip.part"));
    }

    #[test]
    fn test_temp_path_no_extension() {
        let temp = temp_path_for(Path::new("relative/file"));
        assert_eq!(temp, PathBuf::from("relative/file.part"));
    }
}
