use serde::{Deserialize, Serialize};

use crate::config::defaults::{
    default_frequency_penalty, default_max_tokens, default_presence_penalty, default_temperature,
    default_top_p,
};

/// Sampling parameters sent unchanged with every completion request.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_frequency_penalty")]
    pub frequency_penalty: f32,
    #[serde(default = "default_presence_penalty")]
    pub presence_penalty: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            frequency_penalty: default_frequency_penalty(),
            presence_penalty: default_presence_penalty(),
        }
    }
}
