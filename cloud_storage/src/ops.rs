use async_trait::async_trait;

use crate::CloudStorageError;

/// Trait for cloud storage operations to enable testing
#[async_trait]
pub trait CloudStorageOps: Send + Sync {
    /// Delete a single object. A missing object is reported as `CloudStorageError::NotFound`.
    async fn delete_file(&self, cloud_key: &str) -> Result<(), CloudStorageError>;

    /// Check if a file exists in cloud storage
    async fn file_exists(&self, cloud_key: &str) -> Result<bool, CloudStorageError>;

    /// List the keys of every object whose key starts with `prefix`
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, CloudStorageError>;
}
