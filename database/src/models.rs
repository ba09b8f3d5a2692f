use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Video {
    pub id: i64,
    pub identifier: String,
    pub title: String,
    pub cloud_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Audio {
    pub id: i64,
    pub video_id: i64,
    pub cloud_url: Option<String>,
}

/// A video together with its 1:1 audio row, if one was extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoWithAudio {
    pub video: Video,
    pub audio: Option<Audio>,
}

/// Node of the moment tree. Root moments have `parent_id == None` and
/// `is_refined == false`; refined moments point to their root through `parent_id`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Moment {
    pub id: i64,
    pub identifier: String,
    pub video_id: i64,
    pub parent_id: Option<i64>,
    pub is_refined: bool,
    pub title: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl Moment {
    pub fn is_root(&self) -> bool {
        !self.is_refined
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Clip {
    pub id: i64,
    pub moment_id: i64,
    pub video_id: i64,
    pub cloud_url: Option<String>,
    pub start_time: f64,
    pub end_time: f64,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Thumbnail {
    pub id: i64,
    pub video_id: Option<i64>,
    pub clip_id: Option<i64>,
    pub cloud_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipWithThumbnails {
    pub clip: Clip,
    pub thumbnails: Vec<Thumbnail>,
}

/// A moment with every artifact whose cloud url must be captured before the row goes away.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentWithClip {
    pub moment: Moment,
    pub clip: Option<ClipWithThumbnails>,
}

impl MomentWithClip {
    pub fn clip_url(&self) -> Option<&str> {
        self.clip.as_ref().and_then(|c| c.clip.cloud_url.as_deref())
    }

    pub fn thumbnail_urls(&self) -> impl Iterator<Item = &str> {
        self.clip
            .iter()
            .flat_map(|c| c.thumbnails.iter())
            .filter_map(|t| t.cloud_url.as_deref())
    }
}

/// What a `video_file` deletion changed in the relational store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CloudUrlNullification {
    pub video_updated: bool,
    pub audio_updated: bool,
}
