use std::collections::HashMap;

use core_types::keys::{legacy_audio_key, video_blob_prefixes};
use database::models::{ClipWithThumbnails, Thumbnail};

use crate::{
    error::Error,
    pipeline::{PipelineStep, StepAction},
    video_deletion::{context::DeletionContext, model::bump},
};

/// Deletes one blob by stored url, recording a failure on the context.
async fn delete_blob(context: &mut DeletionContext, url: &str) -> bool {
    let blob_deleter = context.deps.blob_deleter.clone();
    match blob_deleter.delete_by_url(url).await {
        Ok(()) => true,
        Err(e) => {
            context.record_error(e.to_string());
            false
        }
    }
}

fn missing_video(context: &DeletionContext) -> StepAction {
    StepAction::Abort(Error::NotFound(format!(
        "video {}",
        context.video_identifier
    )))
}

/// Refuses to continue while a pipeline run for the video is active
pub struct CheckPipelineActivityStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for CheckPipelineActivityStep {
    fn name(&self) -> &'static str {
        "check_pipeline_activity"
    }

    fn should_execute(&self, context: &DeletionContext) -> bool {
        if context.force {
            tracing::warn!(
                "Force set, not checking pipeline activity for video {}",
                context.video_identifier
            );
        }
        !context.force
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        match context
            .deps
            .activity_guard
            .check(&context.video_identifier)
            .await
        {
            Ok(()) => StepAction::Continue,
            Err(e) => StepAction::Abort(e),
        }
    }
}

/// Loads the video with its audio row
pub struct LoadVideoStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for LoadVideoStep {
    fn name(&self) -> &'static str {
        "load_video"
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        tracing::info!("Loading video {}", context.video_identifier);

        let video_res = context
            .deps
            .repository_manager
            .get_video_repository()
            .get_video_with_audio(&context.video_identifier)
            .await;

        match video_res {
            Ok(Some(video)) => {
                tracing::info!(
                    "Found video {} (id {}, audio row: {})",
                    video.video.identifier,
                    video.video.id,
                    video.audio.is_some()
                );
                context.video = Some(video);
                StepAction::Continue
            }
            Ok(None) => {
                tracing::warn!("Video {} not found", context.video_identifier);
                missing_video(context)
            }
            Err(e) => {
                tracing::error!("Failed to load video {}: {}", context.video_identifier, e);
                StepAction::Abort(Error::DbError(format!("Failed to load video: {}", e)))
            }
        }
    }
}

/// Collects every clip of the video with its thumbnails, plus the thumbnails of the video
/// itself. Those keys are not covered by the prefix sweep, so their urls have to be read
/// before the rows go away.
pub struct CollectVideoClipsStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for CollectVideoClipsStep {
    fn name(&self) -> &'static str {
        "collect_video_clips"
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        let Some(video_id) = context.video_row_id() else {
            return missing_video(context);
        };
        let repository_manager = context.deps.repository_manager.clone();

        let clips = match repository_manager
            .get_clip_repository()
            .get_clips_by_video(video_id)
            .await
        {
            Ok(clips) => clips,
            Err(e) => {
                return StepAction::Abort(Error::DbError(format!(
                    "Failed to fetch clips for video {}: {}",
                    video_id, e
                )));
            }
        };

        let clip_ids: Vec<i64> = clips.iter().map(|c| c.id).collect();
        let thumbnails = match repository_manager
            .get_thumbnail_repository()
            .get_thumbnails_by_clips(&clip_ids)
            .await
        {
            Ok(thumbnails) => thumbnails,
            Err(e) => {
                return StepAction::Abort(Error::DbError(format!(
                    "Failed to fetch clip thumbnails for video {}: {}",
                    video_id, e
                )));
            }
        };

        let video_thumbnails = match repository_manager
            .get_thumbnail_repository()
            .get_thumbnails_by_video(video_id)
            .await
        {
            Ok(thumbnails) => thumbnails,
            Err(e) => {
                return StepAction::Abort(Error::DbError(format!(
                    "Failed to fetch thumbnails of video {}: {}",
                    video_id, e
                )));
            }
        };

        let mut thumbnails_by_clip: HashMap<i64, Vec<Thumbnail>> = HashMap::new();
        for thumbnail in thumbnails {
            if let Some(clip_id) = thumbnail.clip_id {
                thumbnails_by_clip.entry(clip_id).or_default().push(thumbnail);
            }
        }

        context.clips = clips
            .into_iter()
            .map(|clip| {
                let thumbnails = thumbnails_by_clip.remove(&clip.id).unwrap_or_default();
                ClipWithThumbnails { clip, thumbnails }
            })
            .collect();

        context.video_thumbnails = video_thumbnails;

        tracing::info!(
            "Collected {} clips and {} video thumbnails for video {}",
            context.clips.len(),
            context.video_thumbnails.len(),
            context.video_identifier
        );
        StepAction::Continue
    }
}

/// Deletes the source video blob and the extracted audio blob by their stored urls
pub struct DeleteVideoBlobsStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for DeleteVideoBlobsStep {
    fn name(&self) -> &'static str {
        "delete_video_blobs"
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        let Some(video) = context.video.clone() else {
            return missing_video(context);
        };

        let mut video_files = 0;
        match video.video.cloud_url.as_deref() {
            Some(url) => {
                if delete_blob(context, url).await {
                    video_files += 1;
                }
            }
            None => tracing::info!("Video {} has no cloud url", video.video.identifier),
        }

        let mut audio_files = 0;
        match &video.audio {
            Some(audio) => match audio.cloud_url.as_deref() {
                Some(url) => {
                    if delete_blob(context, url).await {
                        audio_files += 1;
                    }
                }
                None => tracing::info!("Audio of video {} has no cloud url", video.video.identifier),
            },
            None => {
                let key = legacy_audio_key(
                    &video.video.identifier,
                    &context.deps.settings.legacy_audio_extension,
                );
                tracing::debug!("No audio row, trying legacy audio blob {}", key);
                let blob_deleter = context.deps.blob_deleter.clone();
                match blob_deleter.delete_if_exists(&key).await {
                    Ok(true) => audio_files += 1,
                    Ok(false) => {}
                    Err(e) => context.record_error(e.to_string()),
                }
            }
        }

        let gcs = context.deleted.gcs_mut();
        bump(&mut gcs.video_files, video_files);
        bump(&mut gcs.audio_files, audio_files);
        StepAction::Continue
    }
}

/// Sweeps the key prefixes owned by the video
pub struct SweepBlobPrefixesStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for SweepBlobPrefixesStep {
    fn name(&self) -> &'static str {
        "sweep_blob_prefixes"
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        let blob_deleter = context.deps.blob_deleter.clone();
        let mut prefix_blobs = 0;

        for prefix in video_blob_prefixes(&context.video_identifier) {
            match blob_deleter.delete_by_prefix(&prefix).await {
                Ok(sweep) => {
                    prefix_blobs += sweep.deleted as u64;
                    context.errors.extend(sweep.failures);
                    context.swept_prefixes.push(prefix);
                }
                Err(e) => context.record_error(e.to_string()),
            }
        }

        bump(&mut context.deleted.gcs_mut().prefix_blobs, prefix_blobs);
        StepAction::Continue
    }
}

/// Deletes video and clip thumbnails by stored url, skipping keys a sweep already covered
pub struct DeleteThumbnailBlobsStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for DeleteThumbnailBlobsStep {
    fn name(&self) -> &'static str {
        "delete_thumbnail_blobs"
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        let urls: Vec<String> = context
            .video_thumbnails
            .iter()
            .chain(context.clips.iter().flat_map(|c| c.thumbnails.iter()))
            .filter_map(|t| t.cloud_url.clone())
            .collect();

        let mut thumbnail_files = 0;
        for url in urls {
            let key = context.deps.blob_deleter.key_for(&url);
            if context.is_swept(key) {
                tracing::debug!("Thumbnail {} was removed by a prefix sweep", key);
                continue;
            }
            if delete_blob(context, &url).await {
                thumbnail_files += 1;
            }
        }

        bump(&mut context.deleted.gcs_mut().thumbnail_files, thumbnail_files);
        StepAction::Continue
    }
}

/// Removes the local staging directories of the video
pub struct CleanTempFilesStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for CleanTempFilesStep {
    fn name(&self) -> &'static str {
        "clean_temp_files"
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        let cleanup = context.deps.temp_cleaner.clean(&context.video_identifier);
        context.deleted.temp = Some(cleanup.stats);
        context.errors.extend(cleanup.errors);
        StepAction::Continue
    }
}

/// Removes the pipeline bookkeeping keys of the video
pub struct CleanPipelineStateStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for CleanPipelineStateStep {
    fn name(&self) -> &'static str {
        "clean_pipeline_state"
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        let cleanup = context
            .deps
            .state_cleaner
            .clean(&context.video_identifier)
            .await;
        context.deleted.redis_keys = Some(cleanup.keys_deleted as u64);
        context.errors.extend(cleanup.errors);
        StepAction::Continue
    }
}

/// Deletes the video row; everything else relational goes with it through cascades
pub struct DeleteVideoRecordStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for DeleteVideoRecordStep {
    fn name(&self) -> &'static str {
        "delete_video_record"
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        let Some(video_id) = context.video_row_id() else {
            return missing_video(context);
        };

        let res = context
            .deps
            .repository_manager
            .get_video_repository()
            .delete_video(video_id)
            .await;

        match res {
            Ok(rows) => {
                if rows == 0 {
                    tracing::warn!(
                        "Video {} was already gone when deleting its row",
                        context.video_identifier
                    );
                } else {
                    tracing::info!("Deleted video {} from database", context.video_identifier);
                }
                context.deleted.database_mut().video_deleted = Some(rows > 0);
                StepAction::Continue
            }
            Err(e) => {
                tracing::error!(
                    "Failed to delete video {} from database: {}",
                    context.video_identifier,
                    e
                );
                StepAction::Abort(Error::DbError(format!(
                    "Failed to delete video {}: {}",
                    context.video_identifier, e
                )))
            }
        }
    }
}

/// Clears the cloud urls of the video and its audio row, keeping the rows
pub struct NullifyCloudUrlsStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for NullifyCloudUrlsStep {
    fn name(&self) -> &'static str {
        "nullify_cloud_urls"
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        let Some(video_id) = context.video_row_id() else {
            return missing_video(context);
        };

        let res = context
            .deps
            .repository_manager
            .get_video_repository()
            .nullify_cloud_urls(video_id)
            .await;

        match res {
            Ok(nullification) => {
                tracing::info!(
                    "Cleared cloud urls of video {} (audio updated: {})",
                    context.video_identifier,
                    nullification.audio_updated
                );
                context.deleted.database_mut().cloud_url_nullified =
                    Some(nullification.video_updated);
                StepAction::Continue
            }
            Err(e) => {
                tracing::error!(
                    "Failed to clear cloud urls of video {}: {}",
                    context.video_identifier,
                    e
                );
                StepAction::Abort(Error::DbError(format!(
                    "Failed to clear cloud urls of video {}: {}",
                    context.video_identifier, e
                )))
            }
        }
    }
}

fn finish_without_targets(context: &mut DeletionContext) -> StepAction {
    tracing::info!(
        "No moments to delete for video {}",
        context.video_identifier
    );
    let gcs = context.deleted.gcs_mut();
    bump(&mut gcs.clip_files, 0);
    bump(&mut gcs.thumbnail_files, 0);
    context.deleted.moments = Some(0);
    StepAction::Skip
}

/// Resolves the named moments (or all of them) plus refined children of named roots
pub struct ResolveMomentsStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for ResolveMomentsStep {
    fn name(&self) -> &'static str {
        "resolve_moments"
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        let Some(video_id) = context.video_row_id() else {
            return missing_video(context);
        };

        let res = context
            .deps
            .moment_resolver
            .resolve(video_id, context.moment_ids.as_deref())
            .await;

        match res {
            Ok(targets) if targets.is_empty() => finish_without_targets(context),
            Ok(targets) => {
                tracing::info!(
                    "Resolved {} moments for deletion from video {}",
                    targets.len(),
                    context.video_identifier
                );
                context.targets = targets;
                StepAction::Continue
            }
            Err(e) => StepAction::Abort(Error::DbError(format!(
                "Failed to resolve moments: {}",
                e
            ))),
        }
    }
}

/// Collects every refined moment of the video
pub struct CollectRefinedMomentsStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for CollectRefinedMomentsStep {
    fn name(&self) -> &'static str {
        "collect_refined_moments"
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        let Some(video_id) = context.video_row_id() else {
            return missing_video(context);
        };
        if context.moment_ids.is_some() {
            tracing::info!("Ignoring moment ids, every refined moment is deleted");
        }

        let res = context
            .deps
            .moment_resolver
            .resolve_refined(video_id)
            .await;

        match res {
            Ok(targets) if targets.is_empty() => finish_without_targets(context),
            Ok(targets) => {
                context.targets = targets;
                StepAction::Continue
            }
            Err(e) => StepAction::Abort(Error::DbError(format!(
                "Failed to collect refined moments: {}",
                e
            ))),
        }
    }
}

/// Deletes the clip and clip thumbnail blobs of the resolved moments
pub struct DeleteMomentBlobsStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for DeleteMomentBlobsStep {
    fn name(&self) -> &'static str {
        "delete_moment_blobs"
    }

    fn should_execute(&self, context: &DeletionContext) -> bool {
        !context.targets.is_empty()
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        let clip_urls: Vec<String> = context
            .targets
            .iter()
            .filter_map(|m| m.clip_url().map(str::to_string))
            .collect();
        let thumbnail_urls: Vec<String> = context
            .targets
            .iter()
            .flat_map(|m| m.thumbnail_urls().map(str::to_string))
            .collect();

        let mut clip_files = 0;
        for url in &clip_urls {
            if delete_blob(context, url).await {
                clip_files += 1;
            }
        }

        let mut thumbnail_files = 0;
        for url in &thumbnail_urls {
            if delete_blob(context, url).await {
                thumbnail_files += 1;
            }
        }

        let gcs = context.deleted.gcs_mut();
        bump(&mut gcs.clip_files, clip_files);
        bump(&mut gcs.thumbnail_files, thumbnail_files);
        StepAction::Continue
    }
}

/// Deletes the resolved moment rows; clips and thumbnails go through cascades
pub struct DeleteMomentRecordsStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for DeleteMomentRecordsStep {
    fn name(&self) -> &'static str {
        "delete_moment_records"
    }

    fn should_execute(&self, context: &DeletionContext) -> bool {
        !context.targets.is_empty()
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        let Some(video_id) = context.video_row_id() else {
            return missing_video(context);
        };
        let identifiers: Vec<String> = context
            .targets
            .iter()
            .map(|m| m.moment.identifier.clone())
            .collect();

        let res = context
            .deps
            .repository_manager
            .get_moment_repository()
            .delete_moments(video_id, &identifiers)
            .await;

        match res {
            Ok(rows) => {
                tracing::info!(
                    "Deleted {} of {} moments of video {} from database",
                    rows,
                    identifiers.len(),
                    context.video_identifier
                );
                context.deleted.moments = Some(identifiers.len() as u64);
                context.deleted.database_mut().moments_deleted = Some(rows);
                StepAction::Continue
            }
            Err(e) => StepAction::Abort(Error::DbError(format!(
                "Failed to delete moments of video {}: {}",
                context.video_identifier, e
            ))),
        }
    }
}
