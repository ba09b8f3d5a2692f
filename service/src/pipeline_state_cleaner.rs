use std::sync::Arc;

use core_types::keys::pipeline_state_keys;
use pipeline_state::PipelineStateOps;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStateCleanup {
    pub keys_deleted: usize,
    pub errors: Vec<String>,
}

/// Removes the per-video pipeline bookkeeping keys.
pub struct PipelineStateCleaner {
    state: Arc<dyn PipelineStateOps>,
}

impl PipelineStateCleaner {
    pub fn new(state: Arc<dyn PipelineStateOps>) -> Self {
        Self { state }
    }

    /// Deletes `pipeline:{id}:{active|history|lock|cancel}`. Absent keys are not an error.
    pub async fn clean(&self, video_id: &str) -> PipelineStateCleanup {
        let mut cleanup = PipelineStateCleanup::default();

        for key in pipeline_state_keys(video_id) {
            match self.state.exists(&key).await {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    tracing::error!("Failed to check pipeline state key {}: {}", key, e);
                    cleanup
                        .errors
                        .push(format!("Failed to check pipeline state key {}: {}", key, e));
                    continue;
                }
            }

            match self.state.delete(&key).await {
                Ok(removed) => cleanup.keys_deleted += removed as usize,
                Err(e) => {
                    tracing::error!("Failed to delete pipeline state key {}: {}", key, e);
                    cleanup
                        .errors
                        .push(format!("Failed to delete pipeline state key {}: {}", key, e));
                }
            }
        }

        tracing::info!(
            "Deleted {} pipeline state keys for video {}",
            cleanup.keys_deleted,
            video_id
        );
        cleanup
    }
}
