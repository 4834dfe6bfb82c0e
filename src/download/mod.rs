//! Streaming archive download.
//!
//! [`HttpDownloader`] streams a response body into a validated file path chunk by
//! chunk, creating the parent folder first. A failed or cancelled download never
//! reports success; the partial file is removed on a best-effort basis.

use crate::config::UpdateSettings;
use crate::core::UpdraftError;
use crate::paths::{FilePath, ValidatedPath};
use crate::utils::progress::ProgressBar;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Something that can put the bytes behind a URL into a file.
#[async_trait]
pub trait ArchiveDownloader: Send + Sync {
    /// Download `url` into `destination`, overwriting it. Returns the number of bytes written.
    async fn download(
        &self,
        url: &str,
        destination: &FilePath,
        cancel: &CancellationToken,
    ) -> Result<u64, UpdraftError>;
}

/// HTTP(S) downloader built on `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
    token: Option<String>,
}

impl HttpDownloader {
    /// Wrap an existing client, e.g. the one used for release metadata.
    #[must_use]
    pub fn new(client: Client, token: Option<String>) -> Self {
        Self {
            client,
            token,
        }
    }

    /// Build a downloader with the timeout, user agent and token from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`UpdraftError::Network`] when the HTTP client cannot be created.
    pub fn from_settings(settings: &UpdateSettings) -> Result<Self, UpdraftError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout)
            .build()
            .map_err(|e| UpdraftError::Network {
                operation: "create HTTP client".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::new(client, settings.github_token.clone()))
    }

    async fn stream_to_file(
        &self,
        mut response: reqwest::Response,
        url: &str,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<u64, UpdraftError> {
        let display = path.display().to_string();
        let mut file =
            fs::File::create(path).await.map_err(|e| UpdraftError::from_io(e, "create file", &display))?;

        let progress = ProgressBar::new_download(response.content_length());
        progress.set_prefix(path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default());

        let mut written = 0u64;
        loop {
            let chunk = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    progress.finish_and_clear();
                    return Err(UpdraftError::Cancelled { stage: "download completion".to_string() });
                }
                chunk = response.chunk() => chunk,
            };

            let chunk = match chunk {
                Ok(Some(bytes)) => bytes,
                Ok(None) => break,
                Err(e) => {
                    progress.finish_and_clear();
                    return Err(UpdraftError::from_http(&e, "download archive", url));
                }
            };

            if let Err(e) = file.write_all(&chunk).await {
                progress.finish_and_clear();
                return Err(UpdraftError::from_io(e, "write download", &display));
            }
            written += chunk.len() as u64;
            progress.inc(chunk.len() as u64);
        }

        file.flush().await.map_err(|e| UpdraftError::from_io(e, "flush download", &display))?;
        progress.finish_and_clear();
        Ok(written)
    }
}

#[async_trait]
impl ArchiveDownloader for HttpDownloader {
    async fn download(
        &self,
        url: &str,
        destination: &FilePath,
        cancel: &CancellationToken,
    ) -> Result<u64, UpdraftError> {
        let parsed = Url::parse(url).map_err(|e| UpdraftError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if let Some(parent) = destination.parent_folder() {
            fs::create_dir_all(parent.as_path())
                .await
                .map_err(|e| UpdraftError::from_io(e, "create download folder", parent.as_str()))?;
            assert!(parent.path_exists(), "{parent} missing right after create_dir_all succeeded");
        }

        if cancel.is_cancelled() {
            return Err(UpdraftError::Cancelled {
                stage: "download".to_string(),
            });
        }

        info!("Downloading {url} to {destination}");
        let mut request = self.client.get(parsed);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(UpdraftError::Cancelled { stage: "download".to_string() });
            }
            response = request.send() => {
                response.map_err(|e| UpdraftError::from_http(&e, "download archive", url))?
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(UpdraftError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        match self.stream_to_file(response, url, destination.as_path(), cancel).await {
            Ok(written) => {
                debug!("Wrote {written} bytes to {destination}");
                Ok(written)
            }
            Err(e) => {
                if let Err(remove_err) = fs::remove_file(destination.as_path()).await
                    && remove_err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to remove partial download {destination}: {remove_err}");
                }
                Err(e)
            }
        }
    }
}
