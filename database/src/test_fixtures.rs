//! Row builders for tests. The deletion core never creates rows; these stand in
//! for the ingest stages that do.

use sqlx::{Pool, Sqlite};

pub struct NewMoment {
    pub video_id: i64,
    pub identifier: String,
    pub parent_id: Option<i64>,
    pub is_refined: bool,
    pub generation_config_id: Option<i64>,
    pub start_time: f64,
    pub end_time: f64,
}

impl NewMoment {
    pub fn root(video_id: i64, identifier: &str) -> Self {
        Self {
            video_id,
            identifier: identifier.to_string(),
            parent_id: None,
            is_refined: false,
            generation_config_id: None,
            start_time: 10.0,
            end_time: 40.0,
        }
    }

    pub fn refined(video_id: i64, identifier: &str, parent_id: i64) -> Self {
        Self {
            video_id,
            identifier: identifier.to_string(),
            parent_id: Some(parent_id),
            is_refined: true,
            generation_config_id: None,
            start_time: 12.5,
            end_time: 35.0,
        }
    }
}

pub struct NewClip {
    pub video_id: i64,
    pub moment_id: i64,
    pub cloud_url: Option<String>,
    pub start_time: f64,
    pub end_time: f64,
}

impl NewClip {
    pub fn for_moment(video_id: i64, moment_id: i64, cloud_url: Option<&str>) -> Self {
        Self {
            video_id,
            moment_id,
            cloud_url: cloud_url.map(str::to_string),
            start_time: 10.0,
            end_time: 40.0,
        }
    }
}

pub async fn insert_video(pool: &Pool<Sqlite>, identifier: &str, cloud_url: Option<&str>) -> i64 {
    sqlx::query("INSERT INTO videos (identifier, title, cloud_url) VALUES (?, ?, ?)")
        .bind(identifier)
        .bind(format!("Video {}", identifier))
        .bind(cloud_url)
        .execute(pool)
        .await
        .expect("Failed to insert video")
        .last_insert_rowid()
}

pub async fn insert_audio(pool: &Pool<Sqlite>, video_id: i64, cloud_url: Option<&str>) -> i64 {
    sqlx::query("INSERT INTO audio (video_id, cloud_url) VALUES (?, ?)")
        .bind(video_id)
        .bind(cloud_url)
        .execute(pool)
        .await
        .expect("Failed to insert audio")
        .last_insert_rowid()
}

pub async fn insert_transcript(pool: &Pool<Sqlite>, video_id: i64) -> i64 {
    sqlx::query("INSERT INTO transcripts (video_id, language, content) VALUES (?, 'en', 'hello')")
        .bind(video_id)
        .execute(pool)
        .await
        .expect("Failed to insert transcript")
        .last_insert_rowid()
}

pub async fn insert_generation_config(pool: &Pool<Sqlite>, transcript_id: Option<i64>) -> i64 {
    sqlx::query(
        "INSERT INTO generation_configs (transcript_id, model, config_hash) VALUES (?, 'model', 'hash')",
    )
    .bind(transcript_id)
    .execute(pool)
    .await
    .expect("Failed to insert generation config")
    .last_insert_rowid()
}

pub async fn insert_pipeline_history(
    pool: &Pool<Sqlite>,
    video_id: i64,
    generation_config_id: Option<i64>,
) -> i64 {
    sqlx::query(
        "INSERT INTO pipeline_history (video_id, generation_config_id, status) VALUES (?, ?, 'completed')",
    )
    .bind(video_id)
    .bind(generation_config_id)
    .execute(pool)
    .await
    .expect("Failed to insert pipeline history")
    .last_insert_rowid()
}

pub async fn insert_moment(pool: &Pool<Sqlite>, moment: NewMoment) -> i64 {
    sqlx::query(
        "INSERT INTO moments (identifier, video_id, parent_id, generation_config_id, is_refined, title, start_time, end_time)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&moment.identifier)
    .bind(moment.video_id)
    .bind(moment.parent_id)
    .bind(moment.generation_config_id)
    .bind(moment.is_refined)
    .bind(format!("Moment {}", moment.identifier))
    .bind(moment.start_time)
    .bind(moment.end_time)
    .execute(pool)
    .await
    .expect("Failed to insert moment")
    .last_insert_rowid()
}

pub async fn insert_clip(pool: &Pool<Sqlite>, clip: NewClip) -> i64 {
    sqlx::query(
        "INSERT INTO clips (moment_id, video_id, cloud_url, start_time, end_time) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(clip.moment_id)
    .bind(clip.video_id)
    .bind(&clip.cloud_url)
    .bind(clip.start_time)
    .bind(clip.end_time)
    .execute(pool)
    .await
    .expect("Failed to insert clip")
    .last_insert_rowid()
}

pub async fn insert_video_thumbnail(pool: &Pool<Sqlite>, video_id: i64, cloud_url: &str) -> i64 {
    sqlx::query("INSERT INTO thumbnails (video_id, cloud_url) VALUES (?, ?)")
        .bind(video_id)
        .bind(cloud_url)
        .execute(pool)
        .await
        .expect("Failed to insert video thumbnail")
        .last_insert_rowid()
}

pub async fn insert_clip_thumbnail(pool: &Pool<Sqlite>, clip_id: i64, cloud_url: &str) -> i64 {
    sqlx::query("INSERT INTO thumbnails (clip_id, cloud_url) VALUES (?, ?)")
        .bind(clip_id)
        .bind(cloud_url)
        .execute(pool)
        .await
        .expect("Failed to insert clip thumbnail")
        .last_insert_rowid()
}
