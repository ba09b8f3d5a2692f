use std::sync::Arc;

use cloud_storage::{CloudStorageError, CloudStorageOps, key_from_url};

use crate::error::Error;

/// Outcome of deleting everything under one key prefix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrefixSweep {
    pub deleted: usize,
    /// Keys that were listed but could not be deleted, with the reason
    pub failures: Vec<String>,
}

/// Deletes blobs from the object store by stored url or by key prefix.
pub struct BlobDeleter {
    cloud_storage: Arc<dyn CloudStorageOps>,
    bucket_uri_prefix: String,
}

impl BlobDeleter {
    pub fn new(cloud_storage: Arc<dyn CloudStorageOps>, bucket_uri_prefix: impl Into<String>) -> Self {
        Self {
            cloud_storage,
            bucket_uri_prefix: bucket_uri_prefix.into(),
        }
    }

    pub fn key_for<'a>(&self, url: &'a str) -> &'a str {
        key_from_url(url, &self.bucket_uri_prefix)
    }

    /// Deletes the blob a stored url points to.
    ///
    /// A blob that is already gone is reported as an error, the caller decides what that means.
    pub async fn delete_by_url(&self, url: &str) -> Result<(), Error> {
        let key = self.key_for(url);
        if key.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Cloud url {} does not name an object",
                url
            )));
        }

        match self.cloud_storage.delete_file(key).await {
            Ok(()) => {
                tracing::info!("Deleted blob {}", key);
                Ok(())
            }
            Err(CloudStorageError::NotFound(_)) => {
                tracing::warn!("Blob {} was not found in cloud storage", key);
                Err(Error::CloudStorageError(format!("Blob not found: {}", key)))
            }
            Err(e) => {
                tracing::error!("Failed to delete blob {}: {}", key, e);
                Err(Error::CloudStorageError(format!(
                    "Failed to delete blob {}: {}",
                    key, e
                )))
            }
        }
    }

    /// Deletes a blob only if it exists. Returns whether anything was deleted.
    pub async fn delete_if_exists(&self, key: &str) -> Result<bool, Error> {
        if !self.cloud_storage.file_exists(key).await? {
            tracing::debug!("Blob {} does not exist, nothing to delete", key);
            return Ok(false);
        }
        self.delete_by_url(key).await?;
        Ok(true)
    }

    /// Lists and deletes every blob under `prefix`. Failures on single blobs are collected
    /// and the sweep continues; only a failed listing is returned as an error.
    pub async fn delete_by_prefix(&self, prefix: &str) -> Result<PrefixSweep, Error> {
        let keys = self.cloud_storage.list_keys(prefix).await.map_err(|e| {
            tracing::error!("Failed to list blobs under {}: {}", prefix, e);
            Error::CloudStorageError(format!("Failed to list blobs under {}: {}", prefix, e))
        })?;

        let mut sweep = PrefixSweep::default();
        for key in keys {
            match self.cloud_storage.delete_file(&key).await {
                Ok(()) => sweep.deleted += 1,
                // removed by someone else between list and delete
                Err(CloudStorageError::NotFound(_)) => {
                    tracing::debug!("Blob {} vanished before it could be deleted", key);
                }
                Err(e) => {
                    tracing::error!("Failed to delete blob {}: {}", key, e);
                    sweep
                        .failures
                        .push(format!("Failed to delete blob {}: {}", key, e));
                }
            }
        }

        tracing::info!(
            "Deleted {} blobs under prefix {} ({} failures)",
            sweep.deleted,
            prefix,
            sweep.failures.len()
        );
        Ok(sweep)
    }
}
