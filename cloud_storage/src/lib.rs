// User needs to set the following environment variables:
// - key id (AWS_ACCESS_KEY_ID)
// - application key (AWS_SECRET_ACCESS_KEY)
// - bucket name (CLOUD_STORAGE_BUCKET), for example: clipvault-media
// - endpoint for cloud storage (CLOUD_STORAGE_ENDPOINT), for example: https://storage.googleapis.com
// - region for cloud storage (CLOUD_STORAGE_REGION), for example: auto
//

pub mod mock;
pub mod ops;

use async_trait::async_trait;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;

pub use ops::CloudStorageOps;

#[derive(Debug, thiserror::Error)]
pub enum CloudStorageError {
    #[error("S3 error: {0}")]
    S3(#[from] S3Error),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Other error: {0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloudStorageConfig {
    pub bucket: String,
    pub region: String,
    pub endpoint: String,
    /// Prefix stored urls carry in front of the object key, defaults to `gs://{bucket}/`
    pub bucket_uri_prefix: Option<String>,
}

impl CloudStorageConfig {
    pub fn bucket_uri_prefix(&self) -> String {
        self.bucket_uri_prefix
            .clone()
            .unwrap_or_else(|| format!("gs://{}/", self.bucket))
    }
}

/// Turns a stored url into a bare object key.
///
/// The configured bucket prefix is stripped first. Any other `scheme://bucket/` prefix
/// is stripped as well so urls written under an older bucket name still resolve.
/// Bare keys pass through unchanged.
pub fn key_from_url<'a>(url: &'a str, bucket_uri_prefix: &str) -> &'a str {
    if !bucket_uri_prefix.is_empty()
        && let Some(key) = url.strip_prefix(bucket_uri_prefix)
    {
        return key.trim_start_matches('/');
    }

    match url.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, key)| key).unwrap_or(""),
        None => url.trim_start_matches('/'),
    }
}

pub async fn connect_bucket(config: &CloudStorageConfig) -> Result<Box<Bucket>, CloudStorageError> {
    let region = Region::Custom {
        region: config.region.clone(),
        endpoint: config.endpoint.clone(),
    };

    let credentials = Credentials::default()
        .map_err(|e| CloudStorageError::Other(format!("Credentials error: {e}")))?;

    let bucket = Bucket::new(&config.bucket, region, credentials)?.with_path_style();

    Ok(bucket)
}

/// S3-compatible implementation of `CloudStorageOps`.
pub struct S3CloudStorage {
    bucket: Box<Bucket>,
}

impl S3CloudStorage {
    pub async fn connect(config: &CloudStorageConfig) -> Result<Self, CloudStorageError> {
        let bucket = connect_bucket(config).await?;
        Ok(Self { bucket })
    }
}

fn is_not_found(error: &S3Error) -> bool {
    matches!(error, S3Error::HttpFailWithBody(404, _))
}

#[async_trait]
impl CloudStorageOps for S3CloudStorage {
    async fn delete_file(&self, cloud_key: &str) -> Result<(), CloudStorageError> {
        match self.bucket.delete_object(cloud_key).await {
            Ok(response) if response.status_code() == 404 => {
                Err(CloudStorageError::NotFound(cloud_key.to_string()))
            }
            Ok(_) => Ok(()),
            Err(e) if is_not_found(&e) => Err(CloudStorageError::NotFound(cloud_key.to_string())),
            Err(e) => Err(CloudStorageError::S3(e)),
        }
    }

    async fn file_exists(&self, cloud_key: &str) -> Result<bool, CloudStorageError> {
        match self.bucket.head_object(cloud_key).await {
            Ok((_, status_code)) => Ok(status_code == 200),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(CloudStorageError::S3(e)),
        }
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, CloudStorageError> {
        let pages = self.bucket.list(prefix.to_string(), None).await?;
        let keys = pages
            .into_iter()
            .flat_map(|page| page.contents.into_iter().map(|object| object.key))
            .collect::<Vec<_>>();
        tracing::debug!("Listed {} objects under prefix {}", keys.len(), prefix);
        Ok(keys)
    }
}
