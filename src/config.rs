use std::env;
use std::path::PathBuf;

use anyhow::Result;
use once_cell::sync::Lazy;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub data_dir: PathBuf,
    pub default_region: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub ollama_timeout_seconds: u64,
    pub ollama_tags_timeout_seconds: u64,
}

pub static CONFIG: Lazy<Config> =
    Lazy::new(|| Config::load().expect("Failed to load configuration"));

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn resolve_data_dir() -> PathBuf {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(env_value) = env::var("DATA_DIR") {
        let env_path = PathBuf::from(env_value);
        if env_path.is_absolute() {
            candidates.push(env_path);
        } else {
            candidates.push(
                env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(env_path),
            );
        }
    }
    candidates.push(PathBuf::from("data"));

    for candidate in &candidates {
        if candidate.exists() {
            return candidate.to_path_buf();
        }
    }

    candidates
        .first()
        .cloned()
        .unwrap_or_else(|| PathBuf::from("data"))
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Config {
            log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
            data_dir: resolve_data_dir(),
            default_region: env_string("DEFAULT_REGION", "jp").to_lowercase(),
            ollama_url: env_string("OLLAMA_URL", "http://127.0.0.1:11434/api/generate"),
            ollama_model: env_string("OLLAMA_MODEL", ""),
            ollama_timeout_seconds: env_u64("OLLAMA_TIMEOUT_SECONDS", 60),
            ollama_tags_timeout_seconds: env_u64("OLLAMA_TAGS_TIMEOUT_SECONDS", 5),
        })
    }
}
