use crate::api::{ChatRequest, CompletionProvider, HttpCompletionClient};
use crate::config::{Config, GenerationConfig, MemoryBackend, FALLBACK_REPLY};
use crate::error::{RelayError, Result, StorageError};
use crate::memory::{
    sanitize_user_id, FilesystemMemoryStore, InMemoryStore, MemoryStore, UserLocks,
};
use crate::models::{History, Turn};
use serde_json::Value;
use std::sync::Arc;
use tokio::task;
use tracing::{debug, error, info, warn};

const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct RelayReply {
    pub reply: String,
    pub usage: Option<Value>,
}

/// Validates a message, forwards it with the user's history, records the exchange.
pub struct ChatRelay {
    provider: Arc<dyn CompletionProvider>,
    store: Arc<dyn MemoryStore>,
    locks: UserLocks,
    system_prompt: String,
    model: String,
    generation: GenerationConfig,
}

impl ChatRelay {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        store: Arc<dyn MemoryStore>,
        config: &Config,
    ) -> Self {
        Self {
            provider,
            store,
            locks: UserLocks::new(),
            system_prompt: config.system_prompt.clone(),
            model: config.model.clone(),
            generation: config.generation.clone(),
        }
    }

    /// Wire the HTTP provider and the configured memory backend.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = Arc::new(HttpCompletionClient::from_config(config)?);
        let store: Arc<dyn MemoryStore> = match config.memory_backend {
            MemoryBackend::File => Arc::new(FilesystemMemoryStore::new(&config.memory_dir)?),
            MemoryBackend::Memory => Arc::new(InMemoryStore::new()),
        };
        Ok(Self::new(provider, store, config))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn handle_message(&self, user_id: &str, message: &str) -> Result<RelayReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(RelayError::Validation);
        }

        info!(user = %user_id, message = %preview(message), "incoming message");

        // Held across the whole read-call-write cycle for this user
        let _guard = self.locks.acquire(&sanitize_user_id(user_id)).await;

        let history = self.load_history(user_id).await;
        let request = ChatRequest::new(
            self.model.clone(),
            build_prompt(&self.system_prompt, &history, message),
            &self.generation,
        );
        debug!(user = %user_id, turns = request.messages.len(), model = %self.model, "calling provider");

        let completion = self.provider.complete(&request).await.map_err(|e| {
            error!(user = %user_id, error = %e, "provider call failed");
            e
        })?;

        let reply = completion.content.unwrap_or_else(|| {
            warn!(user = %user_id, "provider returned no usable text, using fallback reply");
            FALLBACK_REPLY.to_string()
        });

        let mut updated = history;
        updated.push(Turn::user(message));
        updated.push(Turn::assistant(reply.clone()));
        if let Err(e) = self.save_history(user_id, updated).await {
            error!(user = %user_id, error = %e, "failed to save conversation history");
        }

        info!(user = %user_id, reply = %preview(&reply), "reply ready");

        Ok(RelayReply {
            reply,
            usage: completion.usage,
        })
    }

    // Store backends do blocking file I/O, so they run on the blocking pool
    async fn load_history(&self, user_id: &str) -> History {
        let store = Arc::clone(&self.store);
        let key = user_id.to_string();
        let loaded = task::spawn_blocking(move || store.load(&key))
            .await
            .map_err(StorageError::from)
            .and_then(|result| result);

        match loaded {
            Ok(history) => history,
            Err(e) => {
                warn!(user = %user_id, error = %e, "failed to read conversation history, starting fresh");
                Vec::new()
            }
        }
    }

    async fn save_history(
        &self,
        user_id: &str,
        history: History,
    ) -> std::result::Result<(), StorageError> {
        let store = Arc::clone(&self.store);
        let key = user_id.to_string();
        task::spawn_blocking(move || store.save(&key, &history)).await?
    }
}

/// System instruction first, then stored history, then the new user turn.
pub fn build_prompt(system_prompt: &str, history: &[Turn], message: &str) -> Vec<Turn> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Turn::system(system_prompt));
    messages.extend(history.iter().cloned());
    messages.push(Turn::user(message));
    messages
}

fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}
