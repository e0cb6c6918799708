use crate::error::StorageError;
use crate::models::{History, Turn};

/// Trait for conversation memory backends
pub trait MemoryStore: Send + Sync {
    /// Load the stored history for a user, empty when nothing was saved yet
    fn load(&self, user_id: &str) -> Result<History, StorageError>;

    /// Replace the stored history with the most recent turns of `history`
    fn save(&self, user_id: &str, history: &[Turn]) -> Result<(), StorageError>;
}
