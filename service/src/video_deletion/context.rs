use std::sync::Arc;

use core_types::DeletionScope;
use database::{
    models::{ClipWithThumbnails, MomentWithClip, Thumbnail, VideoWithAudio},
    repository_manager::RepositoryManager,
};

use crate::{
    activity_guard::ActivityGuard, blob_deleter::BlobDeleter, moment_resolver::MomentResolver,
    pipeline_state_cleaner::PipelineStateCleaner, settings::Settings, temp_cleaner::TempCleaner,
    video_deletion::model::{DeletedSummary, DeletionRequest},
};

/// Collaborators shared by every deletion request.
#[derive(Clone)]
pub struct DeletionDeps {
    pub repository_manager: Arc<RepositoryManager>,
    pub settings: Arc<Settings>,
    pub blob_deleter: Arc<BlobDeleter>,
    pub state_cleaner: Arc<PipelineStateCleaner>,
    pub temp_cleaner: Arc<TempCleaner>,
    pub activity_guard: Arc<ActivityGuard>,
    pub moment_resolver: Arc<MomentResolver>,
}

/// Context object that flows through the pipeline, accumulating state
pub struct DeletionContext {
    pub video_identifier: String,
    pub scope: DeletionScope,
    pub moment_ids: Option<Vec<String>>,
    pub force: bool,
    pub deps: DeletionDeps,

    // Accumulated state as pipeline progresses
    pub video: Option<VideoWithAudio>,
    pub clips: Vec<ClipWithThumbnails>,
    pub video_thumbnails: Vec<Thumbnail>,
    pub targets: Vec<MomentWithClip>,
    pub swept_prefixes: Vec<String>,
    pub deleted: DeletedSummary,
    pub errors: Vec<String>,
}

impl DeletionContext {
    pub fn new(request: DeletionRequest, deps: DeletionDeps) -> Self {
        Self {
            video_identifier: request.video_id,
            scope: request.scope,
            moment_ids: request.moment_ids,
            force: request.force,
            deps,
            video: None,
            clips: vec![],
            video_thumbnails: vec![],
            targets: vec![],
            swept_prefixes: vec![],
            deleted: DeletedSummary::default(),
            errors: vec![],
        }
    }

    /// Row id of the loaded video. Steps after `load_video` may rely on it.
    pub fn video_row_id(&self) -> Option<i64> {
        self.video.as_ref().map(|v| v.video.id)
    }

    pub fn record_error(&mut self, message: String) {
        self.errors.push(message);
    }

    /// Whether a blob key was already covered by a prefix sweep in this request.
    pub fn is_swept(&self, key: &str) -> bool {
        self.swept_prefixes
            .iter()
            .any(|prefix| key.starts_with(prefix.as_str()))
    }
}
