use async_trait::async_trait;

use crate::PipelineStateError;

/// Trait for the key-value store holding in-flight pipeline bookkeeping
#[async_trait]
pub trait PipelineStateOps: Send + Sync {
    /// Read a string value, `None` when the key is absent
    async fn get(&self, key: &str) -> Result<Option<String>, PipelineStateError>;

    async fn exists(&self, key: &str) -> Result<bool, PipelineStateError>;

    /// Delete a key, returning how many keys were removed (0 or 1)
    async fn delete(&self, key: &str) -> Result<u64, PipelineStateError>;
}
