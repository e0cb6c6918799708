use super::storage::MemoryStore;
use super::{sanitize_user_id, truncate_history, MAX_HISTORY_TURNS};
use crate::error::StorageError;
use crate::models::{History, Turn};
use std::fs;
use std::io;
use std::path::PathBuf;
use uuid::Uuid;

/// One pretty-printed JSON file per user under `dir`.
pub struct FilesystemMemoryStore {
    dir: PathBuf,
    max_turns: usize,
}

impl FilesystemMemoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            max_turns: MAX_HISTORY_TURNS,
        })
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn path_for(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_user_id(user_id)))
    }
}

impl MemoryStore for FilesystemMemoryStore {
    fn load(&self, user_id: &str) -> Result<History, StorageError> {
        let path = self.path_for(user_id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        serde_json::from_str(&content).map_err(|source| StorageError::Corrupt { path, source })
    }

    fn save(&self, user_id: &str, history: &[Turn]) -> Result<(), StorageError> {
        let path = self.path_for(user_id);
        let mut kept = history.to_vec();
        truncate_history(&mut kept, self.max_turns);
        let content = serde_json::to_string_pretty(&kept)?;

        // Write the full new content beside the target, then swap it in
        let tmp = path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        fs::write(&tmp, content).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            StorageError::Io { path, source }
        })
    }
}
