pub mod mock;
pub mod ops;

use async_trait::async_trait;
use redis::AsyncCommands;

pub use ops::PipelineStateOps;

#[derive(Debug, thiserror::Error)]
pub enum PipelineStateError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Other error: {0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineStateConfig {
    pub redis_url: String,
}

impl Default for PipelineStateConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1/".to_string(),
        }
    }
}

/// Redis implementation of `PipelineStateOps`.
///
/// A multiplexed connection is opened per call, which keeps the client usable after
/// the server drops idle connections.
pub struct RedisPipelineState {
    client: redis::Client,
}

impl RedisPipelineState {
    pub fn new(config: &PipelineStateConfig) -> Result<Self, PipelineStateError> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, PipelineStateError> {
        let connection = self.client.get_multiplexed_async_connection().await?;
        Ok(connection)
    }
}

#[async_trait]
impl PipelineStateOps for RedisPipelineState {
    async fn get(&self, key: &str) -> Result<Option<String>, PipelineStateError> {
        let mut connection = self.connection().await?;
        let value: Option<String> = connection.get(key).await?;
        Ok(value)
    }

    async fn exists(&self, key: &str) -> Result<bool, PipelineStateError> {
        let mut connection = self.connection().await?;
        let exists: bool = connection.exists(key).await?;
        Ok(exists)
    }

    async fn delete(&self, key: &str) -> Result<u64, PipelineStateError> {
        let mut connection = self.connection().await?;
        let removed: u64 = connection.del(key).await?;
        tracing::debug!("Deleted {} redis key(s) for {}", removed, key);
        Ok(removed)
    }
}
