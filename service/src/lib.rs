pub mod activity_guard;
pub mod blob_deleter;
pub mod error;
pub mod file_system_ops;
pub mod moment_resolver;
pub mod pipeline;
pub mod pipeline_state_cleaner;
pub mod settings;
pub mod temp_cleaner;
pub mod video_deletion;
