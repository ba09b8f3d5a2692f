//! File system operations abstraction for testing
//!
//! The temp cleaner only needs to enumerate, measure and remove files, so that is all
//! this trait exposes.
//!
//! # Usage in Tests
//!
//! ```rust,ignore
//! use service::file_system_ops::mock::MockFileSystemOps;
//!
//! let mock_fs = Arc::new(MockFileSystemOps::new());
//! mock_fs.add_file("/temp/clips/demo/c1.mp4", 1024);
//!
//! let cleaner = TempCleaner::new(PathBuf::from("/temp"), mock_fs.clone());
//! let stats = cleaner.clean("demo");
//!
//! assert!(mock_fs.was_deleted("/temp/clips/demo/c1.mp4"));
//! ```

use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleFileEntry {
    pub path: PathBuf,
    pub size: u64,
}

/// Trait for file system operations to enable testing
pub trait FileSystemOps: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Every regular file below `dir`, recursively
    fn list_files(&self, dir: &Path) -> io::Result<Vec<SimpleFileEntry>>;

    /// Remove a file at the given path
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory and anything left inside it
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Production implementation using std::fs
#[derive(Debug, Clone, Copy)]
pub struct StdFileSystemOps;

impl StdFileSystemOps {
    fn collect_files(dir: &Path, files: &mut Vec<SimpleFileEntry>) -> io::Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                Self::collect_files(&entry.path(), files)?;
            } else {
                files.push(SimpleFileEntry {
                    path: entry.path(),
                    size: entry.metadata()?.len(),
                });
            }
        }
        Ok(())
    }
}

impl FileSystemOps for StdFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<SimpleFileEntry>> {
        let mut files = Vec::new();
        Self::collect_files(dir, &mut files)?;
        Ok(files)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }
}
