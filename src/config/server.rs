use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub embedded_listener: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryBackend {
    #[default]
    File,
    Memory,
}

impl FromStr for MemoryBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" | "fs" => Ok(MemoryBackend::File),
            "memory" | "mem" => Ok(MemoryBackend::Memory),
            other => Err(format!("unknown memory backend '{}'", other)),
        }
    }
}

impl fmt::Display for MemoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryBackend::File => write!(f, "file"),
            MemoryBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MemoryConfig {
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default)]
    pub backend: Option<MemoryBackend>,
}
