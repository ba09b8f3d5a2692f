use std::collections::HashSet;

use core_types::{DeletionScope, DeletionStatus};
use serde::Serialize;

use crate::temp_cleaner::TempCleanupStats;

#[derive(Debug, Clone, PartialEq)]
pub struct DeletionRequest {
    /// Video identifier, not the row id
    pub video_id: String,
    pub scope: DeletionScope,
    /// Only consulted for `DeletionScope::Moments`
    pub moment_ids: Option<Vec<String>>,
    pub force: bool,
}

impl DeletionRequest {
    pub fn new(video_id: impl Into<String>, scope: DeletionScope) -> Self {
        Self {
            video_id: video_id.into(),
            scope,
            moment_ids: None,
            force: false,
        }
    }

    pub fn with_moment_ids(mut self, raw: &str) -> Self {
        self.moment_ids = parse_moment_ids(raw);
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Parses a comma separated identifier list. Blank entries and duplicates are dropped
/// and an empty result means no explicit subset was given.
pub fn parse_moment_ids(raw: &str) -> Option<Vec<String>> {
    let mut seen = HashSet::new();
    let ids: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect();

    if ids.is_empty() { None } else { Some(ids) }
}

/// Blob deletions per artifact kind. Only the kinds a scope touches are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlobCounts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_files: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_files: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_files: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_files: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_blobs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatabaseMutation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_deleted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_url_nullified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moments_deleted: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeletedSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcs: Option<BlobCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<TempCleanupStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis_keys: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moments: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseMutation>,
}

impl DeletedSummary {
    pub fn gcs_mut(&mut self) -> &mut BlobCounts {
        self.gcs.get_or_insert_with(BlobCounts::default)
    }

    pub fn database_mut(&mut self) -> &mut DatabaseMutation {
        self.database.get_or_insert_with(DatabaseMutation::default)
    }

    pub fn is_empty(&self) -> bool {
        *self == DeletedSummary::default()
    }
}

/// Adds to a counter, creating it at zero first.
pub(crate) fn bump(counter: &mut Option<u64>, by: u64) {
    *counter = Some(counter.unwrap_or(0) + by);
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeletionResult {
    pub video_id: String,
    pub status: DeletionStatus,
    pub deleted: DeletedSummary,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

impl DeletionResult {
    /// Status code the HTTP boundary answers with. Relational failures never reach a
    /// result and map to 500 there.
    pub fn http_status(&self) -> u16 {
        match self.status {
            DeletionStatus::Completed | DeletionStatus::Partial => 200,
            DeletionStatus::Failed => 400,
        }
    }

    /// Message shown for a failed request: the first recorded error.
    pub fn primary_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Wire shape of a deletion result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletionResponse {
    pub status: DeletionStatus,
    pub video_id: String,
    pub deleted: DeletedSummary,
    pub errors: Option<Vec<String>>,
    pub duration_ms: u64,
}

impl From<DeletionResult> for DeletionResponse {
    fn from(result: DeletionResult) -> Self {
        Self {
            status: result.status,
            video_id: result.video_id,
            deleted: result.deleted,
            errors: if result.errors.is_empty() {
                None
            } else {
                Some(result.errors)
            },
            duration_ms: result.duration_ms,
        }
    }
}
