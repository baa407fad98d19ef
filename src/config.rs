//! Process configuration
//!
//! Everything is environment-driven with sensible defaults; only the
//! provider API key has no default.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A variable is present but unparseable
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to
    pub addr: SocketAddr,

    /// Path of the SQLite conversation database
    pub db_path: PathBuf,

    /// Path of the append-only usage log
    pub usage_log_path: PathBuf,

    /// Bearer token for the completion provider
    pub openai_api_key: String,

    /// Base URL of the completion provider API
    pub openai_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            db_path: PathBuf::from("chats.db"),
            usage_log_path: PathBuf::from("usage.log"),
            openai_api_key: String::new(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    ///
    /// Recognized variables: `MEDCHAT_ADDR`, `MEDCHAT_DB_PATH`,
    /// `MEDCHAT_USAGE_LOG`, `OPENAI_API_KEY` (required),
    /// `OPENAI_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("MEDCHAT_ADDR") {
            config.addr = parse_addr(&addr)?;
        }
        if let Ok(path) = std::env::var("MEDCHAT_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("MEDCHAT_USAGE_LOG") {
            config.usage_log_path = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            config.openai_base_url = url;
        }

        config.openai_api_key =
            std::env::var("OPENAI_API_KEY").map_err(|_| ConfigError::MissingVar("OPENAI_API_KEY"))?;

        Ok(config)
    }
}

fn parse_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        name: "MEDCHAT_ADDR",
        value: value.to_string(),
    })
}
