use std::sync::Arc;

use sqlx::{Pool, Sqlite};

use crate::{
    database_error::DatabaseError,
    models::{Audio, CloudUrlNullification, Video, VideoWithAudio},
};

#[derive(Debug)]
pub struct VideoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl VideoRepository {
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        Self { pool }
    }

    pub async fn get_video_with_audio(
        &self,
        identifier: &str,
    ) -> Result<Option<VideoWithAudio>, DatabaseError> {
        let video = sqlx::query_as::<_, Video>(
            "SELECT id, identifier, title, cloud_url
             FROM videos
             WHERE identifier = ?",
        )
        .bind(identifier)
        .fetch_optional(&*self.pool)
        .await?;

        let Some(video) = video else {
            return Ok(None);
        };

        let audio = sqlx::query_as::<_, Audio>(
            "SELECT id, video_id, cloud_url
             FROM audio
             WHERE video_id = ?",
        )
        .bind(video.id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(Some(VideoWithAudio { video, audio }))
    }

    /// Deletes the video row. Transcript, audio, moments, clips, thumbnails and
    /// pipeline history go with it through the declared cascades.
    ///
    /// Returns the number of video rows removed (0 when a concurrent request got there first).
    pub async fn delete_video(&self, video_id: i64) -> Result<u64, DatabaseError> {
        let mut transaction = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(video_id)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;
        Ok(result.rows_affected())
    }

    /// Clears the cloud url of the video and of its audio row in one transaction.
    ///
    /// A video row that is already gone leaves everything untouched and reports
    /// `video_updated: false`, the same way `delete_video` reports 0 rows.
    pub async fn nullify_cloud_urls(
        &self,
        video_id: i64,
    ) -> Result<CloudUrlNullification, DatabaseError> {
        let mut transaction = self.pool.begin().await?;

        let video_result = sqlx::query("UPDATE videos SET cloud_url = NULL WHERE id = ?")
            .bind(video_id)
            .execute(&mut *transaction)
            .await?;

        if video_result.rows_affected() == 0 {
            transaction.rollback().await?;
            return Ok(CloudUrlNullification::default());
        }

        let audio_result = sqlx::query("UPDATE audio SET cloud_url = NULL WHERE video_id = ?")
            .bind(video_id)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;

        Ok(CloudUrlNullification {
            video_updated: true,
            audio_updated: audio_result.rows_affected() > 0,
        })
    }
}
