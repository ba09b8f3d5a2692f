use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{CloudStorageError, ops::CloudStorageOps};

/// Internal state for MockCloudStorage.
///
/// Groups all mutable state into a single struct for simplified locking.
#[derive(Default)]
struct MockState {
    /// Keys currently stored
    objects: BTreeSet<String>,
    /// Keys removed through `delete_file`, in call order
    deleted_files: Vec<String>,
    /// Keys that should fail on deletion
    fail_delete_keys: HashSet<String>,
    /// Prefixes whose listing should fail
    fail_list_prefixes: HashSet<String>,
}

/// Mock implementation of CloudStorageOps for testing
///
/// This mock allows you to:
/// - Seed objects that already exist in the bucket
/// - Inject deletion and listing failures per key or prefix
/// - Verify which keys were deleted
#[derive(Clone, Default)]
pub struct MockCloudStorage {
    state: Arc<Mutex<MockState>>,
}

impl MockCloudStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object that already exists in cloud storage
    pub fn add_file(&self, cloud_key: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.objects.insert(cloud_key.into());
    }

    /// Make deletion fail for a specific key
    pub fn fail_delete_for(&self, cloud_key: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.fail_delete_keys.insert(cloud_key.into());
    }

    /// Make listing fail for a specific prefix
    pub fn fail_list_for(&self, prefix: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.fail_list_prefixes.insert(prefix.into());
    }

    pub fn was_deleted(&self, cloud_key: &str) -> bool {
        let state = self.state.lock().unwrap();
        state.deleted_files.iter().any(|k| k == cloud_key)
    }

    pub fn contains(&self, cloud_key: &str) -> bool {
        let state = self.state.lock().unwrap();
        state.objects.contains(cloud_key)
    }

    pub fn get_deleted_keys(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.deleted_files.clone()
    }

    pub fn remaining_keys(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.objects.iter().cloned().collect()
    }
}

#[async_trait]
impl CloudStorageOps for MockCloudStorage {
    async fn delete_file(&self, cloud_key: &str) -> Result<(), CloudStorageError> {
        let mut state = self.state.lock().unwrap();

        if state.fail_delete_keys.contains(cloud_key) {
            return Err(CloudStorageError::Other(format!(
                "Mock deletion failure for key: {}",
                cloud_key
            )));
        }

        if !state.objects.remove(cloud_key) {
            return Err(CloudStorageError::NotFound(cloud_key.to_string()));
        }

        state.deleted_files.push(cloud_key.to_string());
        Ok(())
    }

    async fn file_exists(&self, cloud_key: &str) -> Result<bool, CloudStorageError> {
        let state = self.state.lock().unwrap();
        Ok(state.objects.contains(cloud_key))
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, CloudStorageError> {
        let state = self.state.lock().unwrap();
        if state.fail_list_prefixes.contains(prefix) {
            return Err(CloudStorageError::Other(format!(
                "Mock listing failure for prefix: {}",
                prefix
            )));
        }
        Ok(state
            .objects
            .iter()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[async_std::test]
    async fn test_mock_delete() {
        let mock = MockCloudStorage::new();
        mock.add_file("videos/demo/demo.mp4");

        mock.delete_file("videos/demo/demo.mp4").await.unwrap();

        assert!(mock.was_deleted("videos/demo/demo.mp4"));
        assert!(!mock.contains("videos/demo/demo.mp4"));
    }

    #[async_std::test]
    async fn test_mock_delete_missing_is_not_found() {
        let mock = MockCloudStorage::new();
        let result = mock.delete_file("videos/demo/demo.mp4").await;
        assert!(matches!(result, Err(CloudStorageError::NotFound(_))));
    }

    #[async_std::test]
    async fn test_mock_delete_failure() {
        let mock = MockCloudStorage::new();
        mock.add_file("clips/demo/c1.mp4");
        mock.fail_delete_for("clips/demo/c1.mp4");

        let result = mock.delete_file("clips/demo/c1.mp4").await;

        assert!(matches!(result, Err(CloudStorageError::Other(_))));
        assert!(mock.contains("clips/demo/c1.mp4"));
    }

    #[async_std::test]
    async fn test_mock_list_keys_by_prefix() {
        let mock = MockCloudStorage::new();
        mock.add_file("clips/demo/c1.mp4");
        mock.add_file("clips/demo/c2.mp4");
        mock.add_file("clips/demo2/c1.mp4");

        let keys = mock.list_keys("clips/demo/").await.unwrap();
        assert_eq!(keys, vec!["clips/demo/c1.mp4", "clips/demo/c2.mp4"]);
        assert!(mock.file_exists("clips/demo2/c1.mp4").await.unwrap());
    }
}
