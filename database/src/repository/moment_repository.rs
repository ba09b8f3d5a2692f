use std::sync::Arc;

use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::{database_error::DatabaseError, models::Moment};

const MOMENT_COLUMNS: &str =
    "SELECT id, identifier, video_id, parent_id, is_refined, title, start_time, end_time FROM moments";

#[derive(Debug)]
pub struct MomentRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl MomentRepository {
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        Self { pool }
    }

    pub async fn get_moments_by_video(&self, video_id: i64) -> Result<Vec<Moment>, DatabaseError> {
        let moments = sqlx::query_as::<_, Moment>(&format!(
            "{} WHERE video_id = ? ORDER BY id",
            MOMENT_COLUMNS
        ))
        .bind(video_id)
        .fetch_all(&*self.pool)
        .await?;
        Ok(moments)
    }

    /// Fetches the named moments. Identifiers that belong to another video are ignored.
    pub async fn get_moments_by_identifiers(
        &self,
        video_id: i64,
        identifiers: &[String],
    ) -> Result<Vec<Moment>, DatabaseError> {
        if identifiers.is_empty() {
            return Ok(vec![]);
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new(MOMENT_COLUMNS);
        query_builder.push(" WHERE video_id = ");
        query_builder.push_bind(video_id);
        query_builder.push(" AND identifier IN (");
        let mut separated = query_builder.separated(", ");
        for identifier in identifiers {
            separated.push_bind(identifier.clone());
        }
        separated.push_unseparated(") ORDER BY id");

        let moments = query_builder
            .build_query_as::<Moment>()
            .fetch_all(&*self.pool)
            .await?;
        Ok(moments)
    }

    pub async fn get_refined_children(&self, parent_id: i64) -> Result<Vec<Moment>, DatabaseError> {
        let moments = sqlx::query_as::<_, Moment>(&format!(
            "{} WHERE parent_id = ? AND is_refined = 1 ORDER BY id",
            MOMENT_COLUMNS
        ))
        .bind(parent_id)
        .fetch_all(&*self.pool)
        .await?;
        Ok(moments)
    }

    pub async fn get_refined_moments_by_video(
        &self,
        video_id: i64,
    ) -> Result<Vec<Moment>, DatabaseError> {
        let moments = sqlx::query_as::<_, Moment>(&format!(
            "{} WHERE video_id = ? AND is_refined = 1 ORDER BY id",
            MOMENT_COLUMNS
        ))
        .bind(video_id)
        .fetch_all(&*self.pool)
        .await?;
        Ok(moments)
    }

    /// Deletes the given moments of a video in one transaction. Clips, clip thumbnails
    /// and refined children are removed by the declared cascades.
    pub async fn delete_moments(
        &self,
        video_id: i64,
        identifiers: &[String],
    ) -> Result<u64, DatabaseError> {
        if identifiers.is_empty() {
            return Err(DatabaseError::ValidationError(
                "No moment identifiers given for deletion".to_string(),
            ));
        }

        let mut transaction = self.pool.begin().await?;

        let mut query_builder = QueryBuilder::<Sqlite>::new("DELETE FROM moments WHERE video_id = ");
        query_builder.push_bind(video_id);
        query_builder.push(" AND identifier IN (");
        let mut separated = query_builder.separated(", ");
        for identifier in identifiers {
            separated.push_bind(identifier.clone());
        }
        separated.push_unseparated(")");

        let result = query_builder.build().execute(&mut *transaction).await?;

        transaction.commit().await?;
        Ok(result.rows_affected())
    }
}
