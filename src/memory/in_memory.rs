use super::storage::MemoryStore;
use super::{sanitize_user_id, truncate_history, MAX_HISTORY_TURNS};
use crate::error::StorageError;
use crate::models::{History, Turn};
use std::collections::HashMap;
use std::sync::Mutex;

/// Process-local backend for deployments without a writable disk.
pub struct InMemoryStore {
    histories: Mutex<HashMap<String, History>>,
    max_turns: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            histories: Mutex::new(HashMap::new()),
            max_turns: MAX_HISTORY_TURNS,
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore for InMemoryStore {
    fn load(&self, user_id: &str) -> Result<History, StorageError> {
        let histories = self.histories.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(histories
            .get(&sanitize_user_id(user_id))
            .cloned()
            .unwrap_or_default())
    }

    fn save(&self, user_id: &str, history: &[Turn]) -> Result<(), StorageError> {
        let mut kept = history.to_vec();
        truncate_history(&mut kept, self.max_turns);
        let mut histories = self.histories.lock().map_err(|_| StorageError::Poisoned)?;
        histories.insert(sanitize_user_id(user_id), kept);
        Ok(())
    }
}
