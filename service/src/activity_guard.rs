use std::sync::Arc;

use core_types::{PipelineStatus, keys::pipeline_active_key};
use pipeline_state::PipelineStateOps;
use serde::Deserialize;

use crate::error::Error;

/// Shape of the `pipeline:{id}:active` document written by pipeline runs.
#[derive(Debug, Deserialize)]
struct ActiveRun {
    status: PipelineStatus,
}

/// Refuses destructive operations while a pipeline run for the video is active.
///
/// This is a check-then-act precondition, not a lock: a run may start right after it passes.
pub struct ActivityGuard {
    state: Arc<dyn PipelineStateOps>,
}

impl ActivityGuard {
    pub fn new(state: Arc<dyn PipelineStateOps>) -> Self {
        Self { state }
    }

    pub async fn check(&self, video_id: &str) -> Result<(), Error> {
        let key = pipeline_active_key(video_id);
        let value = self.state.get(&key).await.map_err(|e| {
            tracing::error!("Failed to read pipeline status for {}: {}", video_id, e);
            Error::PipelineActive(format!(
                "Unable to verify pipeline status for video {}: {}. Use force to override",
                video_id, e
            ))
        })?;

        let Some(value) = value else {
            return Ok(());
        };

        match serde_json::from_str::<ActiveRun>(&value) {
            Ok(run) if run.status.is_active() => {
                tracing::warn!(
                    "Pipeline for video {} is {}, refusing deletion",
                    video_id,
                    run.status
                );
                Err(Error::PipelineActive(format!(
                    "Pipeline is {} for video {}. Use force to override",
                    run.status, video_id
                )))
            }
            Ok(run) => {
                tracing::debug!("Pipeline for video {} is {}", video_id, run.status);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    "Unreadable pipeline status for video {}: {}",
                    video_id,
                    e
                );
                Err(Error::PipelineActive(format!(
                    "Unable to verify pipeline status for video {}. Use force to override",
                    video_id
                )))
            }
        }
    }
}
