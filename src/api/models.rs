use crate::config::GenerationConfig;
use crate::models::Turn;
use serde::Serialize;
use serde_json::Value;

/// Body of a chat completions call, OpenAI wire format.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Turn>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub stream: bool,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Turn>, generation: &GenerationConfig) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: generation.temperature,
            max_tokens: generation.max_tokens,
            top_p: generation.top_p,
            frequency_penalty: generation.frequency_penalty,
            presence_penalty: generation.presence_penalty,
            stream: false,
        }
    }
}

/// What a provider handed back for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// First choice's text, `None` when the provider gave nothing usable
    pub content: Option<String>,
    /// Token accounting as reported by the provider
    pub usage: Option<Value>,
}
