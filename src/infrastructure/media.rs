//! Local photo storage: downloads by URL and multipart batches.
//!
//! Uploaded parts are first streamed to extension-less staging files in the
//! hidden `.staging` subdirectory, then committed as a batch by renaming each
//! one into the upload directory with the extension of the name the client
//! sent. Static serving skips dot directories, so staged bytes are never
//! addressable.

use crate::domain::error::DomainError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub const MAX_UPLOAD_PARTS: usize = 100;
pub const UPLOAD_FIELD: &str = "photos";
const STAGING_DIR: &str = ".staging";

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DomainError>;
}

pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::Download(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Download(format!("{} responded {}", url, status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::Download(e.to_string()))?;
        debug!(bytes = body.len(), "Image downloaded");
        Ok(body.to_vec())
    }
}

/// A part already written to the upload directory under a staging name.
#[derive(Debug, Clone)]
pub struct StagedUpload {
    pub path: PathBuf,
    pub original_name: String,
}

/// Extension to keep from a client-supplied filename.
///
/// Text after the final `.`, kept only if it is non-empty ASCII alphanumeric.
/// Anything else means the file is stored without an extension.
pub fn extension_of(original_name: &str) -> Option<&str> {
    let (_, ext) = original_name.rsplit_once('.')?;
    if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(ext)
    } else {
        None
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub struct MediaStore {
    dir: PathBuf,
    fetcher: Arc<dyn ImageFetcher>,
}

impl MediaStore {
    pub fn new(dir: impl Into<PathBuf>, fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            dir: dir.into(),
            fetcher,
        }
    }

    /// Creates the upload directory and its staging subdirectory.
    pub async fn ensure_dir(&self) -> Result<()> {
        let staging = self.dir.join(STAGING_DIR);
        tokio::fs::create_dir_all(&staging)
            .await
            .with_context(|| format!("cannot create upload dir {}", staging.display()))
    }

    /// Fresh staging path with a random 32 hex digit name and no extension.
    pub fn staging_path(&self) -> PathBuf {
        self.dir
            .join(STAGING_DIR)
            .join(format!("{:032x}", fastrand::u128(..)))
    }

    #[instrument(skip(self))]
    pub async fn fetch_by_url(&self, url: &str) -> Result<String> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(
                DomainError::Validation("link must be an http(s) URL".to_string()).into(),
            );
        }

        let body = self.fetcher.fetch(url).await?;

        let name = format!(
            "photo{}{:08x}.jpg",
            Utc::now().timestamp_millis(),
            fastrand::u32(..)
        );
        let dest = self.dir.join(&name);
        tokio::fs::write(&dest, &body)
            .await
            .with_context(|| format!("cannot write {}", dest.display()))?;

        info!(file = %name, bytes = body.len(), "Stored photo from link");
        Ok(name)
    }

    /// Commits a batch of staged parts and returns their stored names in order.
    ///
    /// All or nothing: if any rename fails, every file belonging to the
    /// batch is removed before the error is returned.
    #[instrument(skip(self, parts), fields(count = parts.len()))]
    pub async fn accept_upload(&self, parts: Vec<StagedUpload>) -> Result<Vec<String>> {
        if parts.len() > MAX_UPLOAD_PARTS {
            self.discard(&parts).await;
            return Err(DomainError::Validation(format!(
                "at most {} files per upload",
                MAX_UPLOAD_PARTS
            ))
            .into());
        }

        let mut committed: Vec<PathBuf> = Vec::with_capacity(parts.len());
        let mut names = Vec::with_capacity(parts.len());
        for (index, part) in parts.iter().enumerate() {
            let mut name = file_name_of(&part.path);
            if let Some(ext) = extension_of(&part.original_name) {
                name.push('.');
                name.push_str(ext);
            }
            let target = self.dir.join(&name);

            if let Err(e) = tokio::fs::rename(&part.path, &target).await {
                warn!(
                    index = index,
                    original = %part.original_name,
                    error = %e,
                    "Upload commit failed, rolling back batch"
                );
                for path in &committed {
                    let _ = tokio::fs::remove_file(path).await;
                }
                self.discard(&parts[index..]).await;
                return Err(anyhow::Error::new(e).context(format!(
                    "failed to store upload {}",
                    part.original_name
                )));
            }
            committed.push(target);
            names.push(name);
        }

        info!(count = names.len(), "Upload batch stored");
        Ok(names)
    }

    /// Best-effort removal of staging files that will never be committed.
    pub async fn discard(&self, parts: &[StagedUpload]) {
        for part in parts {
            if let Err(e) = tokio::fs::remove_file(&part.path).await {
                debug!(path = %part.path.display(), error = %e, "Staged file already gone");
            }
        }
    }
}
