use std::sync::Arc;

use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::{database_error::DatabaseError, models::Thumbnail};

#[derive(Debug)]
pub struct ThumbnailRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl ThumbnailRepository {
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        Self { pool }
    }

    pub async fn get_thumbnails_by_clip(
        &self,
        clip_id: i64,
    ) -> Result<Vec<Thumbnail>, DatabaseError> {
        let thumbnails = sqlx::query_as::<_, Thumbnail>(
            "SELECT id, video_id, clip_id, cloud_url
             FROM thumbnails
             WHERE clip_id = ?
             ORDER BY id",
        )
        .bind(clip_id)
        .fetch_all(&*self.pool)
        .await?;
        Ok(thumbnails)
    }

    /// Thumbnails attached to the video itself rather than to one of its clips.
    pub async fn get_thumbnails_by_video(
        &self,
        video_id: i64,
    ) -> Result<Vec<Thumbnail>, DatabaseError> {
        let thumbnails = sqlx::query_as::<_, Thumbnail>(
            "SELECT id, video_id, clip_id, cloud_url
             FROM thumbnails
             WHERE video_id = ?
             ORDER BY id",
        )
        .bind(video_id)
        .fetch_all(&*self.pool)
        .await?;
        Ok(thumbnails)
    }

    pub async fn get_thumbnails_by_clips(
        &self,
        clip_ids: &[i64],
    ) -> Result<Vec<Thumbnail>, DatabaseError> {
        if clip_ids.is_empty() {
            return Ok(vec![]);
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new(
            "SELECT id, video_id, clip_id, cloud_url FROM thumbnails WHERE clip_id IN (",
        );
        let mut separated = query_builder.separated(", ");
        for clip_id in clip_ids {
            separated.push_bind(*clip_id);
        }
        separated.push_unseparated(") ORDER BY id");

        let thumbnails = query_builder
            .build_query_as::<Thumbnail>()
            .fetch_all(&*self.pool)
            .await?;
        Ok(thumbnails)
    }
}
