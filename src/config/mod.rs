mod api;
mod defaults;
mod generation;
mod server;

use crate::cli::Args;
use crate::error::{RelayError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use api::{normalize_endpoint, ApiConfig};
pub use defaults::{
    DEFAULT_API_ENDPOINT, DEFAULT_MEMORY_DIR, DEFAULT_MODEL, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SYSTEM_PROMPT, FALLBACK_REPLY,
};
pub use generation::GenerationConfig;
pub use server::{MemoryBackend, MemoryConfig, ServerConfig};

pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// Settings resolved once at startup and handed to the relay and server.
///
/// Not `Debug`: it carries the provider credential.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_endpoint: String,
    pub model: String,
    pub system_prompt: String,
    pub request_timeout_secs: u64,
    pub generation: GenerationConfig,
    pub port: u16,
    pub embedded_listener: bool,
    pub memory_backend: MemoryBackend,
    pub memory_dir: PathBuf,
    pub verbose: bool,
}

/// On-disk configuration, YAML or JSON.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// A config with built-in defaults, mostly useful for tests and embedding.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            generation: GenerationConfig::default(),
            port: DEFAULT_PORT,
            embedded_listener: true,
            memory_backend: MemoryBackend::File,
            memory_dir: PathBuf::from(DEFAULT_MEMORY_DIR),
            verbose: false,
        }
    }

    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load(args.config.as_deref())
            .map_err(|e| RelayError::Config(format!("{:#}", e)))?;
        Self::resolve(args, file_config, |key| env::var(key).ok())
    }

    /// Merge sources with precedence CLI args > environment > config file > default.
    pub fn resolve<F>(args: &Args, file_config: FileConfig, env_var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // The credential is only ever taken from the environment
        let api_key = env_var(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                RelayError::Config(format!("{} environment variable not set", API_KEY_ENV))
            })?;

        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env_var("AI_API_ENDPOINT"))
            .or(file_config.api.endpoint)
            .map(|endpoint| normalize_endpoint(&endpoint))
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let model = env_var("AI_MODEL")
            .or(file_config.model.default_model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let system_prompt = env_var("AI_SYSTEM_PROMPT")
            .or(file_config.model.system_prompt)
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let request_timeout_secs = env_var("AI_REQUEST_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .or(file_config.api.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let port = args
            .port
            .or_else(|| env_var("PORT").and_then(|p| p.parse::<u16>().ok()))
            .or(file_config.server.port)
            .unwrap_or(DEFAULT_PORT);

        // A managed host drives the router itself in production
        let production = env_var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        let embedded_listener = !production && file_config.server.embedded_listener.unwrap_or(true);

        let memory_backend = match env_var("MEMORY_BACKEND") {
            Some(value) => value.parse::<MemoryBackend>().map_err(RelayError::Config)?,
            None => file_config.memory.backend.unwrap_or_default(),
        };

        let memory_dir = args
            .memory_dir
            .clone()
            .or_else(|| env_var("MEMORY_DIR").map(PathBuf::from))
            .or(file_config.memory.dir.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEMORY_DIR));

        let verbose = args.verbose
            || env_var("AI_VERBOSE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false);

        Ok(Config {
            api_key,
            api_endpoint,
            model,
            system_prompt,
            request_timeout_secs,
            generation: file_config.generation,
            port,
            embedded_listener,
            memory_backend,
            memory_dir,
            verbose,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl FileConfig {
    /// Load from `explicit` when given, otherwise from the first existing default path.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".coach-relay.yaml"),
            PathBuf::from(".coach-relay.yml"),
            PathBuf::from(".coach-relay.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let config_dir = config_dir.join("coach-relay");
            paths.push(config_dir.join("coach-relay.yaml"));
            paths.push(config_dir.join("coach-relay.yml"));
            paths.push(config_dir.join("coach-relay.json"));
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let result = Config::resolve(&Args::default(), FileConfig::default(), env_from(&[]));
        assert!(matches!(result, Err(RelayError::Config(_))));
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let config = Config::resolve(
            &Args::default(),
            FileConfig::default(),
            env_from(&[(API_KEY_ENV, "sk-test")]),
        )
        .unwrap();

        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.request_timeout(), Duration::from_secs(20));
        assert_eq!(config.port, 3000);
        assert!(config.embedded_listener);
        assert_eq!(config.memory_backend, MemoryBackend::File);
        assert_eq!(config.generation, GenerationConfig::default());
    }

    #[test]
    fn args_beat_env_and_env_beats_file() {
        let args = Args {
            port: Some(8080),
            ..Args::default()
        };
        let mut file_config = FileConfig::default();
        file_config.server.port = Some(9000);
        file_config.model.default_model = Some("from-file".to_string());
        file_config.api.timeout_secs = Some(25);

        let config = Config::resolve(
            &args,
            file_config,
            env_from(&[(API_KEY_ENV, "sk-test"), ("PORT", "7000"), ("AI_MODEL", "from-env")]),
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.model, "from-env");
        assert_eq!(config.request_timeout_secs, 25);
    }

    #[test]
    fn production_disables_embedded_listener() {
        let config = Config::resolve(
            &Args::default(),
            FileConfig::default(),
            env_from(&[(API_KEY_ENV, "sk-test"), ("APP_ENV", "production")]),
        )
        .unwrap();
        assert!(!config.embedded_listener);
    }

    #[test]
    fn verbose_comes_from_flag_or_env() {
        let from_env = Config::resolve(
            &Args::default(),
            FileConfig::default(),
            env_from(&[(API_KEY_ENV, "sk-test"), ("AI_VERBOSE", "TRUE")]),
        )
        .unwrap();
        assert!(from_env.verbose);
        assert_eq!(crate::logging::default_level(from_env.verbose), "debug");

        let args = Args {
            verbose: true,
            ..Args::default()
        };
        let from_flag =
            Config::resolve(&args, FileConfig::default(), env_from(&[(API_KEY_ENV, "sk-test")]))
                .unwrap();
        assert!(from_flag.verbose);

        let quiet = Config::resolve(
            &Args::default(),
            FileConfig::default(),
            env_from(&[(API_KEY_ENV, "sk-test"), ("AI_VERBOSE", "no")]),
        )
        .unwrap();
        assert_eq!(crate::logging::default_level(quiet.verbose), "info");
    }

    #[test]
    fn unknown_memory_backend_is_rejected() {
        let result = Config::resolve(
            &Args::default(),
            FileConfig::default(),
            env_from(&[(API_KEY_ENV, "sk-test"), ("MEMORY_BACKEND", "redis")]),
        );
        assert!(matches!(result, Err(RelayError::Config(_))));
    }

    #[test]
    fn endpoint_base_urls_are_normalized() {
        assert_eq!(
            normalize_endpoint("http://localhost:11434/v1"),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(
            normalize_endpoint("https://api.deepseek.com/"),
            "https://api.deepseek.com/v1/chat/completions"
        );
        assert_eq!(normalize_endpoint(DEFAULT_API_ENDPOINT), DEFAULT_API_ENDPOINT);
    }

    #[test]
    fn yaml_file_config_parses_partial_sections() {
        let yaml = "model:\n  default_model: deepseek-reasoner\ngeneration:\n  temperature: 0.2\nmemory:\n  backend: memory\n";
        let config: FileConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.model.default_model.as_deref(), Some("deepseek-reasoner"));
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.generation.max_tokens, 1000);
        assert_eq!(config.memory.backend, Some(MemoryBackend::Memory));
    }
}
