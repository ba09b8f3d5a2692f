use std::{collections::HashSet, sync::Arc};

use database::{
    models::{ClipWithThumbnails, Moment, MomentWithClip},
    repository_manager::RepositoryManager,
};

use crate::error::Error;

/// Computes which moments a deletion touches and loads their clips and thumbnails
/// while the rows still exist.
pub struct MomentResolver {
    repository_manager: Arc<RepositoryManager>,
}

impl MomentResolver {
    pub fn new(repository_manager: Arc<RepositoryManager>) -> Self {
        Self { repository_manager }
    }

    /// Without `moment_ids` every moment of the video is returned. With `moment_ids` the
    /// named moments are returned together with the refined children of every named root.
    pub async fn resolve(
        &self,
        video_id: i64,
        moment_ids: Option<&[String]>,
    ) -> Result<Vec<MomentWithClip>, Error> {
        let moments_repository = self.repository_manager.get_moment_repository();

        let moments = match moment_ids {
            None => moments_repository.get_moments_by_video(video_id).await?,
            Some(identifiers) => {
                let named = moments_repository
                    .get_moments_by_identifiers(video_id, identifiers)
                    .await?;
                if named.len() < identifiers.len() {
                    tracing::warn!(
                        "{} of {} named moments were not found for video {}",
                        identifiers.len() - named.len(),
                        identifiers.len(),
                        video_id
                    );
                }
                self.with_refined_children(named).await?
            }
        };

        let mut resolved = Vec::with_capacity(moments.len());
        for moment in moments {
            resolved.push(self.attach_clip(moment).await?);
        }
        Ok(resolved)
    }

    /// Every refined moment of the video with its clip and thumbnails.
    pub async fn resolve_refined(&self, video_id: i64) -> Result<Vec<MomentWithClip>, Error> {
        let moments = self
            .repository_manager
            .get_moment_repository()
            .get_refined_moments_by_video(video_id)
            .await?;

        let mut resolved = Vec::with_capacity(moments.len());
        for moment in moments {
            resolved.push(self.attach_clip(moment).await?);
        }
        Ok(resolved)
    }

    async fn with_refined_children(&self, named: Vec<Moment>) -> Result<Vec<Moment>, Error> {
        let mut seen: HashSet<i64> = named.iter().map(|m| m.id).collect();
        let mut children = Vec::new();

        for root in named.iter().filter(|m| m.is_root()) {
            let refined = self
                .repository_manager
                .get_moment_repository()
                .get_refined_children(root.id)
                .await?;
            tracing::debug!(
                "Root moment {} has {} refined children",
                root.identifier,
                refined.len()
            );
            children.extend(refined.into_iter().filter(|child| seen.insert(child.id)));
        }

        let mut moments = named;
        moments.extend(children);
        Ok(moments)
    }

    async fn attach_clip(&self, moment: Moment) -> Result<MomentWithClip, Error> {
        let clip = self
            .repository_manager
            .get_clip_repository()
            .get_clip_by_moment(moment.id)
            .await?;

        let clip = match clip {
            Some(clip) => {
                let thumbnails = self
                    .repository_manager
                    .get_thumbnail_repository()
                    .get_thumbnails_by_clip(clip.id)
                    .await?;
                Some(ClipWithThumbnails { clip, thumbnails })
            }
            None => None,
        };

        Ok(MomentWithClip { moment, clip })
    }
}
