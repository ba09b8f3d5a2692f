use std::{sync::Arc, time::Instant};

use cloud_storage::CloudStorageOps;
use core_types::DeletionStatus;
use database::repository_manager::RepositoryManager;
use pipeline_state::PipelineStateOps;

use crate::{
    activity_guard::ActivityGuard,
    blob_deleter::BlobDeleter,
    error::Error,
    file_system_ops::{FileSystemOps, StdFileSystemOps},
    moment_resolver::MomentResolver,
    pipeline::Pipeline,
    pipeline_state_cleaner::PipelineStateCleaner,
    settings::Settings,
    temp_cleaner::TempCleaner,
    video_deletion::{
        context::{DeletionContext, DeletionDeps},
        model::{DeletedSummary, DeletionRequest, DeletionResult},
    },
};

/// Tears down a video, or a subset of its derived artifacts, across the object store,
/// the relational store, the pipeline state store and the local staging trees.
///
/// Side-effect failures are collected into the result and downgrade it to `partial`.
/// Missing videos and guard violations produce a `failed` result. Only relational
/// failures are returned as `Err`.
pub struct VideoDeletionService {
    deps: DeletionDeps,
}

impl VideoDeletionService {
    pub fn new(
        repository_manager: Arc<RepositoryManager>,
        settings: Arc<Settings>,
        cloud_storage: Arc<dyn CloudStorageOps>,
        pipeline_state: Arc<dyn PipelineStateOps>,
    ) -> Self {
        Self::new_with_fs_ops(
            repository_manager,
            settings,
            cloud_storage,
            pipeline_state,
            Arc::new(StdFileSystemOps),
        )
    }

    pub fn new_with_fs_ops(
        repository_manager: Arc<RepositoryManager>,
        settings: Arc<Settings>,
        cloud_storage: Arc<dyn CloudStorageOps>,
        pipeline_state: Arc<dyn PipelineStateOps>,
        fs_ops: Arc<dyn FileSystemOps>,
    ) -> Self {
        let deps = DeletionDeps {
            blob_deleter: Arc::new(BlobDeleter::new(
                cloud_storage,
                settings.bucket_uri_prefix.clone(),
            )),
            state_cleaner: Arc::new(PipelineStateCleaner::new(pipeline_state.clone())),
            activity_guard: Arc::new(ActivityGuard::new(pipeline_state)),
            temp_cleaner: Arc::new(TempCleaner::new(settings.temp_root_dir.clone(), fs_ops)),
            moment_resolver: Arc::new(MomentResolver::new(repository_manager.clone())),
            repository_manager,
            settings,
        };
        Self { deps }
    }

    pub async fn delete(&self, request: DeletionRequest) -> Result<DeletionResult, Error> {
        let started = Instant::now();
        let video_id = request.video_id.clone();
        let scope = request.scope;

        if video_id.trim().is_empty() {
            return Ok(DeletionResult {
                video_id,
                status: DeletionStatus::Failed,
                deleted: DeletedSummary::default(),
                errors: vec![Error::InvalidInput("video id must not be empty".to_string()).to_string()],
                duration_ms: started.elapsed().as_millis() as u64,
            });
        }

        tracing::info!(
            "Deleting video {} with scope {} (force: {})",
            video_id,
            scope,
            request.force
        );

        let mut context = DeletionContext::new(request, self.deps.clone());
        let pipeline = Pipeline::<DeletionContext>::for_scope(scope);

        let status = match pipeline.execute(&mut context).await {
            Ok(()) if context.errors.is_empty() => DeletionStatus::Completed,
            Ok(()) => DeletionStatus::Partial,
            Err(e) if e.is_request_failure() => {
                context.errors.insert(0, e.to_string());
                DeletionStatus::Failed
            }
            Err(e) => {
                tracing::error!("Deletion of video {} failed hard: {}", video_id, e);
                return Err(e);
            }
        };

        let result = DeletionResult {
            video_id,
            status,
            deleted: context.deleted,
            errors: context.errors,
            duration_ms: started.elapsed().as_millis() as u64,
        };

        tracing::info!(
            "Deletion of video {} finished as {} with {} errors in {} ms",
            result.video_id,
            result.status,
            result.errors.len(),
            result.duration_ms
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use cloud_storage::mock::MockCloudStorage;
    use core_types::DeletionScope;
    use database::{
        setup_test_db,
        test_fixtures::{
            NewClip, NewMoment, insert_audio, insert_clip, insert_clip_thumbnail, insert_moment,
            insert_pipeline_history, insert_transcript, insert_video, insert_video_thumbnail,
        },
    };
    use pipeline_state::mock::MockPipelineState;
    use sqlx::{Pool, Sqlite};

    use super::*;
    use crate::{
        file_system_ops::mock::MockFileSystemOps,
        pipeline::{PipelineStep, StepAction},
        video_deletion::{
            model::{BlobCounts, DatabaseMutation},
            steps::NullifyCloudUrlsStep,
        },
    };

    struct Harness {
        service: VideoDeletionService,
        pool: Arc<Pool<Sqlite>>,
        repository_manager: Arc<RepositoryManager>,
        cloud: MockCloudStorage,
        state: MockPipelineState,
        fs: MockFileSystemOps,
    }

    async fn harness() -> Harness {
        let pool = Arc::new(setup_test_db().await);
        let repository_manager = Arc::new(RepositoryManager::new(pool.clone()));
        let settings = Arc::new(Settings {
            temp_root_dir: PathBuf::from("/temp"),
            bucket_uri_prefix: "gs://bucket/".to_string(),
            ..Default::default()
        });
        let cloud = MockCloudStorage::new();
        let state = MockPipelineState::new();
        let fs = MockFileSystemOps::new();

        let service = VideoDeletionService::new_with_fs_ops(
            repository_manager.clone(),
            settings,
            Arc::new(cloud.clone()),
            Arc::new(state.clone()),
            Arc::new(fs.clone()),
        );

        Harness {
            service,
            pool,
            repository_manager,
            cloud,
            state,
            fs,
        }
    }

    async fn count(pool: &Pool<Sqlite>, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    /// Video "demo" with audio, transcript, history, a video thumbnail and two root
    /// moments; root-a has two refined children. Every clip has two thumbnails stored
    /// outside the video's prefixes.
    async fn seed_demo(h: &Harness) -> i64 {
        let pool = &h.pool;
        let video_id = insert_video(pool, "demo", Some("gs://bucket/videos/demo/demo.mp4")).await;
        insert_audio(pool, video_id, Some("gs://bucket/audio/demo/demo.wav")).await;
        insert_transcript(pool, video_id).await;
        insert_pipeline_history(pool, video_id, None).await;
        insert_video_thumbnail(pool, video_id, "gs://bucket/thumbnails/video/demo.jpg").await;
        h.cloud.add_file("videos/demo/demo.mp4");
        h.cloud.add_file("audio/demo/demo.wav");
        h.cloud.add_file("thumbnails/video/demo.jpg");

        let root_a = insert_moment(pool, NewMoment::root(video_id, "root-a")).await;
        let root_b = insert_moment(pool, NewMoment::root(video_id, "root-b")).await;
        let a1 = insert_moment(pool, NewMoment::refined(video_id, "a-1", root_a)).await;
        let a2 = insert_moment(pool, NewMoment::refined(video_id, "a-2", root_a)).await;

        for (moment_id, name) in [(root_a, "root-a"), (root_b, "root-b"), (a1, "a-1"), (a2, "a-2")] {
            let clip_key = format!("clips/demo/{}.mp4", name);
            let clip_id = insert_clip(
                pool,
                NewClip::for_moment(video_id, moment_id, Some(&format!("gs://bucket/{}", clip_key))),
            )
            .await;
            h.cloud.add_file(clip_key);
            for n in 1..=2 {
                let thumb_key = format!("thumbnails/clips/{}-{}.jpg", name, n);
                insert_clip_thumbnail(pool, clip_id, &format!("gs://bucket/{}", thumb_key)).await;
                h.cloud.add_file(thumb_key);
            }
        }

        video_id
    }

    fn identifiers(moments: &[database::models::Moment]) -> Vec<&str> {
        moments.iter().map(|m| m.identifier.as_str()).collect()
    }

    #[async_std::test]
    async fn test_missing_video_fails_for_every_scope() {
        let h = harness().await;
        for scope in [
            DeletionScope::All,
            DeletionScope::VideoFile,
            DeletionScope::Moments,
            DeletionScope::RefinedMoments,
        ] {
            let result = h
                .service
                .delete(DeletionRequest::new("ghost", scope))
                .await
                .unwrap();
            assert_eq!(result.status, DeletionStatus::Failed);
            assert!(result.deleted.is_empty());
            assert_eq!(result.errors, vec!["Not found: video ghost".to_string()]);
            assert_eq!(result.http_status(), 400);
        }
        assert!(h.cloud.get_deleted_keys().is_empty());
    }

    #[async_std::test]
    async fn test_empty_video_id_is_rejected() {
        let h = harness().await;
        let result = h
            .service
            .delete(DeletionRequest::new("  ", DeletionScope::All))
            .await
            .unwrap();
        assert_eq!(result.status, DeletionStatus::Failed);
        assert_eq!(result.errors.len(), 1);
    }

    #[async_std::test]
    async fn test_scope_all_removes_everything() {
        let h = harness().await;
        let video_id = seed_demo(&h).await;
        h.fs.add_file("/temp/videos/demo/demo.mp4", 100);
        h.fs.add_file("/temp/clips/demo/root-a.mp4", 20);
        h.state.set("pipeline:demo:history", "[]");
        h.state.set("pipeline:demo:lock", "1");

        let result = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::All))
            .await
            .unwrap();

        assert_eq!(result.status, DeletionStatus::Completed, "{:?}", result.errors);
        assert_eq!(
            result.deleted.gcs,
            Some(BlobCounts {
                video_files: Some(1),
                audio_files: Some(1),
                // the 4 clips under clips/demo/
                prefix_blobs: Some(4),
                // the video thumbnail + 8 clip thumbnails
                thumbnail_files: Some(9),
                clip_files: None,
            })
        );
        assert_eq!(result.deleted.redis_keys, Some(2));
        let temp = result.deleted.temp.clone().unwrap();
        assert_eq!((temp.files_deleted, temp.bytes_freed, temp.dirs_removed), (2, 120, 2));
        assert_eq!(
            result.deleted.database,
            Some(DatabaseMutation {
                video_deleted: Some(true),
                ..Default::default()
            })
        );
        assert!(h.cloud.remaining_keys().is_empty());

        let repository = h.repository_manager.get_video_repository();
        assert!(repository.get_video_with_audio("demo").await.unwrap().is_none());
        for table in [
            "moments",
            "clips",
            "thumbnails",
            "transcripts",
            "audio",
            "pipeline_history",
        ] {
            assert_eq!(count(&h.pool, table).await, 0, "table {}", table);
        }
        let moments = h
            .repository_manager
            .get_moment_repository()
            .get_moments_by_video(video_id)
            .await
            .unwrap();
        assert!(moments.is_empty());
    }

    #[async_std::test]
    async fn test_scope_all_leaves_sibling_identifiers_alone() {
        let h = harness().await;
        seed_demo(&h).await;
        let sibling =
            insert_video(&h.pool, "demo2", Some("gs://bucket/videos/demo2/demo2.mp4")).await;
        insert_video_thumbnail(&h.pool, sibling, "gs://bucket/thumbnails/video/demo2.jpg").await;
        let sibling_keys = [
            "videos/demo2/demo2.mp4",
            "clips/demo2/m1.mp4",
            "thumbnails/video/demo2.jpg",
            "thumbnails/video/demo2/frame.jpg",
        ];
        for key in sibling_keys {
            h.cloud.add_file(key);
        }
        h.cloud.add_file("thumbnails/video/demo/frame.jpg");

        let result = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::All))
            .await
            .unwrap();

        assert_eq!(result.status, DeletionStatus::Completed, "{:?}", result.errors);
        assert!(h.cloud.was_deleted("thumbnails/video/demo.jpg"));
        assert!(h.cloud.was_deleted("thumbnails/video/demo/frame.jpg"));
        for key in sibling_keys {
            assert!(h.cloud.contains(key), "{} was removed", key);
        }
        assert_eq!(h.cloud.remaining_keys().len(), sibling_keys.len());

        let sibling_row = h
            .repository_manager
            .get_video_repository()
            .get_video_with_audio("demo2")
            .await
            .unwrap();
        assert!(sibling_row.is_some());
        assert_eq!(count(&h.pool, "thumbnails").await, 1);
    }

    #[async_std::test]
    async fn test_scope_all_twice_fails_with_not_found() {
        let h = harness().await;
        seed_demo(&h).await;

        let first = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::All))
            .await
            .unwrap();
        assert_eq!(first.status, DeletionStatus::Completed);

        let second = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::All))
            .await
            .unwrap();
        assert_eq!(second.status, DeletionStatus::Failed);
        assert_eq!(second.primary_error(), Some("Not found: video demo"));
    }

    #[async_std::test]
    async fn test_scope_all_blob_failure_is_partial() {
        let h = harness().await;
        seed_demo(&h).await;
        h.cloud.fail_delete_for("thumbnails/clips/root-b-2.jpg");

        let result = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::All))
            .await
            .unwrap();

        assert_eq!(result.status, DeletionStatus::Partial);
        assert_eq!(result.http_status(), 200);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("thumbnails/clips/root-b-2.jpg"));
        assert_eq!(
            result.deleted.database.as_ref().unwrap().video_deleted,
            Some(true)
        );
        assert_eq!(count(&h.pool, "videos").await, 0);
    }

    #[async_std::test]
    async fn test_scope_all_missing_blob_counts_as_failure() {
        let h = harness().await;
        insert_video(&h.pool, "demo", Some("gs://bucket/videos/demo/demo.mp4")).await;

        let result = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::All))
            .await
            .unwrap();

        assert_eq!(result.status, DeletionStatus::Partial);
        assert_eq!(
            result.errors,
            vec!["Cloud storage error: Blob not found: videos/demo/demo.mp4".to_string()]
        );
    }

    #[async_std::test]
    async fn test_scope_all_uses_legacy_audio_key_without_audio_row() {
        let h = harness().await;
        insert_video(&h.pool, "old", None).await;
        h.cloud.add_file("audio/old/old.wav");

        let result = h
            .service
            .delete(DeletionRequest::new("old", DeletionScope::All))
            .await
            .unwrap();

        assert_eq!(result.status, DeletionStatus::Completed);
        let gcs = result.deleted.gcs.unwrap();
        assert_eq!(gcs.audio_files, Some(1));
        assert_eq!(gcs.video_files, Some(0));
        assert_eq!(gcs.prefix_blobs, Some(0));
        assert!(h.cloud.was_deleted("audio/old/old.wav"));
    }

    #[async_std::test]
    async fn test_scope_all_state_failure_is_partial() {
        let h = harness().await;
        insert_video(&h.pool, "demo", None).await;
        h.state.fail_for("pipeline:demo:cancel");

        let result = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::All))
            .await
            .unwrap();

        assert_eq!(result.status, DeletionStatus::Partial);
        assert!(result.errors[0].contains("pipeline:demo:cancel"));
        assert_eq!(count(&h.pool, "videos").await, 0);
    }

    #[async_std::test]
    async fn test_active_pipeline_blocks_guarded_scopes() {
        let h = harness().await;
        seed_demo(&h).await;
        h.state
            .set("pipeline:demo:active", r#"{"status":"processing","step":"clips"}"#);

        for scope in [DeletionScope::All, DeletionScope::Moments] {
            let result = h
                .service
                .delete(DeletionRequest::new("demo", scope))
                .await
                .unwrap();
            assert_eq!(result.status, DeletionStatus::Failed);
            assert_eq!(result.errors.len(), 1);
            assert!(result.errors[0].contains("processing"));
            assert!(result.deleted.is_empty());
        }

        assert!(h.cloud.get_deleted_keys().is_empty());
        assert_eq!(count(&h.pool, "moments").await, 4);
    }

    #[async_std::test]
    async fn test_force_overrides_active_pipeline() {
        let h = harness().await;
        seed_demo(&h).await;
        h.state.set("pipeline:demo:active", r#"{"status":"queued"}"#);

        let result = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::All).with_force(true))
            .await
            .unwrap();

        assert_eq!(result.status, DeletionStatus::Completed);
        assert!(!h.state.contains("pipeline:demo:active"));
        assert_eq!(count(&h.pool, "videos").await, 0);
    }

    #[async_std::test]
    async fn test_scope_video_file_demo_scenario() {
        let h = harness().await;
        let video_id =
            insert_video(&h.pool, "demo", Some("gs://bucket/videos/demo/demo.mp4")).await;
        insert_audio(&h.pool, video_id, Some("gs://bucket/audio/demo/demo.wav")).await;
        insert_transcript(&h.pool, video_id).await;
        h.cloud.add_file("videos/demo/demo.mp4");
        h.cloud.add_file("audio/demo/demo.wav");

        let result = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::VideoFile))
            .await
            .unwrap();

        assert_eq!(result.status, DeletionStatus::Completed);
        assert_eq!(
            result.deleted.gcs,
            Some(BlobCounts {
                video_files: Some(1),
                audio_files: Some(1),
                ..Default::default()
            })
        );
        assert_eq!(
            result.deleted.database.as_ref().unwrap().cloud_url_nullified,
            Some(true)
        );

        let video = h
            .repository_manager
            .get_video_repository()
            .get_video_with_audio("demo")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(video.video.cloud_url, None);
        assert_eq!(video.audio.unwrap().cloud_url, None);
        assert_eq!(count(&h.pool, "transcripts").await, 1);
    }

    #[async_std::test]
    async fn test_scope_video_file_keeps_moments_and_ignores_guard() {
        let h = harness().await;
        seed_demo(&h).await;
        h.state.set("pipeline:demo:active", r#"{"status":"processing"}"#);

        let result = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::VideoFile))
            .await
            .unwrap();

        assert_eq!(result.status, DeletionStatus::Completed);
        assert_eq!(count(&h.pool, "moments").await, 4);
        assert_eq!(count(&h.pool, "clips").await, 4);
        assert!(h.cloud.contains("clips/demo/root-a.mp4"));
        assert!(h.state.contains("pipeline:demo:active"));
    }

    #[async_std::test]
    async fn test_scope_moments_named_root_takes_refined_children() {
        let h = harness().await;
        let video_id = seed_demo(&h).await;

        let result = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::Moments).with_moment_ids("root-a"))
            .await
            .unwrap();

        assert_eq!(result.status, DeletionStatus::Completed);
        assert_eq!(result.deleted.moments, Some(3));
        assert_eq!(
            result.deleted.gcs,
            Some(BlobCounts {
                clip_files: Some(3),
                thumbnail_files: Some(6),
                ..Default::default()
            })
        );
        for key in [
            "clips/demo/a-1.mp4",
            "clips/demo/a-2.mp4",
            "thumbnails/clips/a-1-1.jpg",
            "thumbnails/clips/a-2-2.jpg",
        ] {
            assert!(h.cloud.was_deleted(key), "{}", key);
        }
        assert!(h.cloud.contains("clips/demo/root-b.mp4"));

        let remaining = h
            .repository_manager
            .get_moment_repository()
            .get_moments_by_video(video_id)
            .await
            .unwrap();
        assert_eq!(identifiers(&remaining), vec!["root-b"]);
        assert_eq!(count(&h.pool, "clips").await, 1);
        assert_eq!(count(&h.pool, "thumbnails").await, 3);
    }

    #[async_std::test]
    async fn test_scope_moments_without_ids_removes_all_moments() {
        let h = harness().await;
        seed_demo(&h).await;

        let result = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::Moments))
            .await
            .unwrap();

        assert_eq!(result.status, DeletionStatus::Completed);
        assert_eq!(result.deleted.moments, Some(4));
        assert_eq!(count(&h.pool, "moments").await, 0);
        assert_eq!(count(&h.pool, "videos").await, 1);
        assert!(h.cloud.contains("videos/demo/demo.mp4"));
    }

    #[async_std::test]
    async fn test_scope_moments_with_unknown_ids_completes_with_zero_counts() {
        let h = harness().await;
        seed_demo(&h).await;

        let result = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::Moments).with_moment_ids("nope"))
            .await
            .unwrap();

        assert_eq!(result.status, DeletionStatus::Completed);
        assert_eq!(result.deleted.moments, Some(0));
        assert_eq!(result.deleted.database, None);
        assert_eq!(count(&h.pool, "moments").await, 4);
    }

    #[async_std::test]
    async fn test_scope_refined_moments_ignores_moment_ids() {
        let h = harness().await;
        let video_id = seed_demo(&h).await;

        let result = h
            .service
            .delete(
                DeletionRequest::new("demo", DeletionScope::RefinedMoments)
                    .with_moment_ids("root-b"),
            )
            .await
            .unwrap();

        assert_eq!(result.status, DeletionStatus::Completed);
        assert_eq!(result.deleted.moments, Some(2));

        let remaining = h
            .repository_manager
            .get_moment_repository()
            .get_moments_by_video(video_id)
            .await
            .unwrap();
        assert_eq!(identifiers(&remaining), vec!["root-a", "root-b"]);
        assert!(h.cloud.contains("clips/demo/root-a.mp4"));
        assert!(!h.cloud.contains("clips/demo/a-1.mp4"));
        assert_eq!(count(&h.pool, "videos").await, 1);
    }

    #[async_std::test]
    async fn test_scope_refined_moments_ignores_guard() {
        let h = harness().await;
        seed_demo(&h).await;
        h.state.set("pipeline:demo:active", r#"{"status":"processing"}"#);

        let result = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::RefinedMoments))
            .await
            .unwrap();

        assert_eq!(result.status, DeletionStatus::Completed, "{:?}", result.errors);
        assert_eq!(result.deleted.moments, Some(2));
        assert!(h.cloud.was_deleted("clips/demo/a-1.mp4"));
        assert!(h.cloud.was_deleted("clips/demo/a-2.mp4"));
        assert_eq!(count(&h.pool, "moments").await, 2);
        assert!(h.state.contains("pipeline:demo:active"));
    }

    #[async_std::test]
    async fn test_nullify_after_concurrent_delete_reports_no_change() {
        let h = harness().await;
        let video_id =
            insert_video(&h.pool, "demo", Some("gs://bucket/videos/demo/demo.mp4")).await;
        let video_repository = h.repository_manager.get_video_repository();
        let loaded = video_repository.get_video_with_audio("demo").await.unwrap();

        let mut context = DeletionContext::new(
            DeletionRequest::new("demo", DeletionScope::VideoFile),
            h.service.deps.clone(),
        );
        context.video = loaded;
        // another request removes the row between load_video and the write
        assert_eq!(video_repository.delete_video(video_id).await.unwrap(), 1);

        let action = NullifyCloudUrlsStep.execute(&mut context).await;

        assert_eq!(action, StepAction::Continue);
        assert_eq!(
            context.deleted.database,
            Some(DatabaseMutation {
                cloud_url_nullified: Some(false),
                ..Default::default()
            })
        );
        assert!(context.errors.is_empty());
    }

    #[async_std::test]
    async fn test_failed_video_delete_keeps_rows_after_side_effects() {
        let h = harness().await;
        seed_demo(&h).await;
        h.state.set("pipeline:demo:history", "[]");
        h.fs.add_file("/temp/videos/demo/demo.mp4", 100);
        sqlx::query(
            "CREATE TRIGGER block_video_delete BEFORE DELETE ON videos
             BEGIN
                 SELECT RAISE(ABORT, 'video rows are locked');
             END",
        )
        .execute(&*h.pool)
        .await
        .unwrap();

        let result = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::All))
            .await;

        match result {
            Err(Error::DbError(message)) => assert!(message.contains("video rows are locked")),
            other => panic!("expected a database error, got {:?}", other),
        }

        assert_eq!(count(&h.pool, "videos").await, 1);
        assert_eq!(count(&h.pool, "moments").await, 4);
        assert_eq!(count(&h.pool, "thumbnails").await, 9);

        assert!(h.cloud.was_deleted("videos/demo/demo.mp4"));
        assert!(h.cloud.was_deleted("thumbnails/video/demo.jpg"));
        assert!(h.cloud.was_deleted("thumbnails/clips/root-a-1.jpg"));
        assert!(h.cloud.remaining_keys().is_empty());
        assert!(!h.state.contains("pipeline:demo:history"));
        assert!(h.fs.was_deleted("/temp/videos/demo/demo.mp4"));
    }

    #[async_std::test]
    async fn test_failed_video_read_is_returned_as_error() {
        let h = harness().await;
        insert_video(&h.pool, "demo", None).await;
        h.pool.close().await;

        let result = h
            .service
            .delete(DeletionRequest::new("demo", DeletionScope::VideoFile))
            .await;

        assert!(matches!(result, Err(Error::DbError(_))));
    }
}
