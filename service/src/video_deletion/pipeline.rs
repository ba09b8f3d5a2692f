use core_types::DeletionScope;

use crate::{
    pipeline::Pipeline,
    video_deletion::{
        context::DeletionContext,
        steps::{
            CheckPipelineActivityStep, CleanPipelineStateStep, CleanTempFilesStep,
            CollectRefinedMomentsStep, CollectVideoClipsStep, DeleteMomentBlobsStep,
            DeleteMomentRecordsStep, DeleteThumbnailBlobsStep, DeleteVideoBlobsStep,
            DeleteVideoRecordStep, LoadVideoStep, NullifyCloudUrlsStep, ResolveMomentsStep,
            SweepBlobPrefixesStep,
        },
    },
};

impl Pipeline<DeletionContext> {
    /// Step sequence for one deletion scope. Relational writes always come last.
    pub fn for_scope(scope: DeletionScope) -> Self {
        match scope {
            DeletionScope::All => Self::with_steps(vec![
                Box::new(CheckPipelineActivityStep),
                Box::new(LoadVideoStep),
                Box::new(CollectVideoClipsStep),
                Box::new(DeleteVideoBlobsStep),
                Box::new(SweepBlobPrefixesStep),
                Box::new(DeleteThumbnailBlobsStep),
                Box::new(CleanTempFilesStep),
                Box::new(CleanPipelineStateStep),
                Box::new(DeleteVideoRecordStep),
            ]),
            DeletionScope::VideoFile => Self::with_steps(vec![
                Box::new(LoadVideoStep),
                Box::new(DeleteVideoBlobsStep),
                Box::new(CleanTempFilesStep),
                Box::new(NullifyCloudUrlsStep),
            ]),
            DeletionScope::Moments => Self::with_steps(vec![
                Box::new(CheckPipelineActivityStep),
                Box::new(LoadVideoStep),
                Box::new(ResolveMomentsStep),
                Box::new(DeleteMomentBlobsStep),
                Box::new(DeleteMomentRecordsStep),
            ]),
            DeletionScope::RefinedMoments => Self::with_steps(vec![
                Box::new(LoadVideoStep),
                Box::new(CollectRefinedMomentsStep),
                Box::new(DeleteMomentBlobsStep),
                Box::new(DeleteMomentRecordsStep),
            ]),
        }
    }
}
