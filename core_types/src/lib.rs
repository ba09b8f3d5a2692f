use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub mod keys;

/// Which subset of a video's artifacts a deletion request targets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeletionScope {
    /// The video row and everything derived from it.
    All,
    /// Only the source video and audio blobs. Rows are kept, cloud urls are nulled.
    VideoFile,
    /// Named moments (or every moment) together with their refined children.
    Moments,
    /// Every refined moment of the video.
    RefinedMoments,
}

impl DeletionScope {
    /// Scopes that refuse to run while a pipeline is active unless forced.
    pub fn is_guarded(&self) -> bool {
        matches!(self, DeletionScope::All | DeletionScope::Moments)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeletionStatus {
    Completed,
    Partial,
    Failed,
}

/// The four purpose-partitioned local staging trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum TempPurpose {
    Videos,
    Audio,
    Clips,
    Thumbnails,
}

impl TempPurpose {
    pub fn dir_name(&self) -> &'static str {
        match self {
            TempPurpose::Videos => "videos",
            TempPurpose::Audio => "audio",
            TempPurpose::Clips => "clips",
            TempPurpose::Thumbnails => "thumbnails",
        }
    }
}

/// Status of a pipeline run as published in the ephemeral state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Pending,
    Queued,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl PipelineStatus {
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            PipelineStatus::Pending | PipelineStatus::Queued | PipelineStatus::Processing
        )
    }
}
