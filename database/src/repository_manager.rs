use std::sync::Arc;

use sqlx::{Pool, Sqlite};

use crate::repository::{
    clip_repository::ClipRepository, moment_repository::MomentRepository,
    thumbnail_repository::ThumbnailRepository, video_repository::VideoRepository,
};

#[derive(Debug)]
pub struct RepositoryManager {
    video_repository: VideoRepository,
    moment_repository: MomentRepository,
    clip_repository: ClipRepository,
    thumbnail_repository: ThumbnailRepository,
}

impl RepositoryManager {
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        let video_repository = VideoRepository::new(pool.clone());
        let moment_repository = MomentRepository::new(pool.clone());
        let clip_repository = ClipRepository::new(pool.clone());
        let thumbnail_repository = ThumbnailRepository::new(pool);

        Self {
            video_repository,
            moment_repository,
            clip_repository,
            thumbnail_repository,
        }
    }

    pub fn get_video_repository(&self) -> &VideoRepository {
        &self.video_repository
    }

    pub fn get_moment_repository(&self) -> &MomentRepository {
        &self.moment_repository
    }

    pub fn get_clip_repository(&self) -> &ClipRepository {
        &self.clip_repository
    }

    pub fn get_thumbnail_repository(&self) -> &ThumbnailRepository {
        &self.thumbnail_repository
    }
}
