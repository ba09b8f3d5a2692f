//! Key layouts shared by the object store and the ephemeral state store.

use crate::TempPurpose;

/// Key prefixes swept when a whole video is removed.
///
/// Every prefix ends in `/` so identifiers sharing a leading substring never
/// match each other. The flat `thumbnails/video/{id}.jpg` form is not covered
/// here and is deleted through its `thumbnails` row instead.
pub fn video_blob_prefixes(video_id: &str) -> Vec<String> {
    vec![
        format!("videos/{}/", video_id),
        format!("audio/{}/", video_id),
        format!("clips/{}/", video_id),
        format!("thumbnails/video/{}/", video_id),
    ]
}

/// Conventional location of extracted audio for videos ingested before audio rows existed.
pub fn legacy_audio_key(video_id: &str, extension: &str) -> String {
    format!("audio/{}/{}.{}", video_id, video_id, extension)
}

pub fn pipeline_active_key(video_id: &str) -> String {
    format!("pipeline:{}:active", video_id)
}

/// Every per-video key written by pipeline runs.
pub fn pipeline_state_keys(video_id: &str) -> [String; 4] {
    [
        pipeline_active_key(video_id),
        format!("pipeline:{}:history", video_id),
        format!("pipeline:{}:lock", video_id),
        format!("pipeline:{}:cancel", video_id),
    ]
}

/// Relative path of a per-identifier staging directory, e.g. `clips/demo`.
pub fn temp_dir_relative(purpose: TempPurpose, identifier: &str) -> String {
    format!("{}/{}", purpose.dir_name(), identifier)
}
