use std::sync::Arc;

use sqlx::{Pool, Sqlite};

use crate::{database_error::DatabaseError, models::Clip};

#[derive(Debug)]
pub struct ClipRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl ClipRepository {
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        Self { pool }
    }

    pub async fn get_clip_by_moment(&self, moment_id: i64) -> Result<Option<Clip>, DatabaseError> {
        let clip = sqlx::query_as::<_, Clip>(
            "SELECT id, moment_id, video_id, cloud_url, start_time, end_time
             FROM clips
             WHERE moment_id = ?",
        )
        .bind(moment_id)
        .fetch_optional(&*self.pool)
        .await?;
        Ok(clip)
    }

    pub async fn get_clips_by_video(&self, video_id: i64) -> Result<Vec<Clip>, DatabaseError> {
        let clips = sqlx::query_as::<_, Clip>(
            "SELECT id, moment_id, video_id, cloud_url, start_time, end_time
             FROM clips
             WHERE video_id = ?
             ORDER BY id",
        )
        .bind(video_id)
        .fetch_all(&*self.pool)
        .await?;
        Ok(clips)
    }
}
