use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{PipelineStateError, ops::PipelineStateOps};

#[derive(Default)]
struct MockState {
    values: HashMap<String, String>,
    deleted_keys: Vec<String>,
    fail_keys: HashSet<String>,
}

/// In-memory `PipelineStateOps` with per-key failure injection
#[derive(Clone, Default)]
pub struct MockPipelineState {
    state: Arc<Mutex<MockState>>,
}

impl MockPipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.values.insert(key.into(), value.into());
    }

    /// Every operation on `key` fails
    pub fn fail_for(&self, key: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.fail_keys.insert(key.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        let state = self.state.lock().unwrap();
        state.values.contains_key(key)
    }

    pub fn get_deleted_keys(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.deleted_keys.clone()
    }

    fn check_failure(state: &MockState, key: &str) -> Result<(), PipelineStateError> {
        if state.fail_keys.contains(key) {
            return Err(PipelineStateError::Other(format!(
                "Mock failure for key: {}",
                key
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PipelineStateOps for MockPipelineState {
    async fn get(&self, key: &str) -> Result<Option<String>, PipelineStateError> {
        let state = self.state.lock().unwrap();
        Self::check_failure(&state, key)?;
        Ok(state.values.get(key).cloned())
    }

    async fn exists(&self, key: &str) -> Result<bool, PipelineStateError> {
        let state = self.state.lock().unwrap();
        Self::check_failure(&state, key)?;
        Ok(state.values.contains_key(key))
    }

    async fn delete(&self, key: &str) -> Result<u64, PipelineStateError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state, key)?;
        if state.values.remove(key).is_some() {
            state.deleted_keys.push(key.to_string());
            Ok(1)
        } else {
            Ok(0)
        }
    }
}
