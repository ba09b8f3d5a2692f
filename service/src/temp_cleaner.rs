use std::{path::PathBuf, sync::Arc};

use core_types::TempPurpose;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::file_system_ops::FileSystemOps;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TempCleanupStats {
    pub files_deleted: u64,
    pub bytes_freed: u64,
    pub dirs_removed: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TempCleanup {
    pub stats: TempCleanupStats,
    pub errors: Vec<String>,
}

/// Removes per-identifier working directories from the local staging trees.
pub struct TempCleaner {
    temp_root_dir: PathBuf,
    fs_ops: Arc<dyn FileSystemOps>,
}

impl TempCleaner {
    pub fn new(temp_root_dir: PathBuf, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self {
            temp_root_dir,
            fs_ops,
        }
    }

    pub fn dir_for(&self, purpose: TempPurpose, identifier: &str) -> PathBuf {
        self.temp_root_dir.join(purpose.dir_name()).join(identifier)
    }

    /// Cleans `temp/{videos|audio|clips|thumbnails}/{identifier}`.
    pub fn clean(&self, identifier: &str) -> TempCleanup {
        let mut cleanup = TempCleanup::default();
        for purpose in TempPurpose::iter() {
            self.clean_purpose(purpose, identifier, &mut cleanup);
        }

        tracing::info!(
            "Temp cleanup for {}: {} files, {} bytes, {} dirs",
            identifier,
            cleanup.stats.files_deleted,
            cleanup.stats.bytes_freed,
            cleanup.stats.dirs_removed
        );
        cleanup
    }

    fn clean_purpose(&self, purpose: TempPurpose, identifier: &str, cleanup: &mut TempCleanup) {
        let dir = self.dir_for(purpose, identifier);
        if !self.fs_ops.exists(&dir) {
            tracing::debug!("Temp dir {} does not exist, skipping", dir.display());
            return;
        }

        let files = match self.fs_ops.list_files(&dir) {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("Failed to list temp dir {}: {}", dir.display(), e);
                cleanup
                    .errors
                    .push(format!("Failed to list temp dir {}: {}", dir.display(), e));
                return;
            }
        };

        let mut failed = false;
        for file in files {
            match self.fs_ops.remove_file(&file.path) {
                Ok(()) => {
                    cleanup.stats.files_deleted += 1;
                    cleanup.stats.bytes_freed += file.size;
                }
                Err(e) => {
                    failed = true;
                    tracing::error!("Failed to delete temp file {}: {}", file.path.display(), e);
                    cleanup.errors.push(format!(
                        "Failed to delete temp file {}: {}",
                        file.path.display(),
                        e
                    ));
                }
            }
        }

        // keep the directory around if a file in it could not be removed
        if failed {
            return;
        }

        match self.fs_ops.remove_dir_all(&dir) {
            Ok(()) => cleanup.stats.dirs_removed += 1,
            Err(e) => {
                tracing::error!("Failed to remove temp dir {}: {}", dir.display(), e);
                cleanup
                    .errors
                    .push(format!("Failed to remove temp dir {}: {}", dir.display(), e));
            }
        }
    }
}
