pub mod clip_repository;
pub mod moment_repository;
pub mod thumbnail_repository;
pub mod video_repository;
