//! Assistant configuration
//!
//! Loaded from a TOML file with three sections:
//!
//! ```toml
//! [llm]
//! api_url = "https://api.anthropic.com/v1/messages"
//! model = "claude-3-haiku-20240307"
//! api_key_env = "LLM_API_KEY"
//! timeout_secs = 30
//!
//! [store]
//! backend = "sqlite"
//! path = "scheduler.db"
//! busy_timeout_ms = 5000
//!
//! [logging]
//! filter = "schedule_assistant=info"
//! ```
//!
//! Every field has a default, so an empty file (or no file) is a valid config.

use crate::core::error::{Result, ScheduleError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration for the assistant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub llm: LlmConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

/// Settings for the intent classifier's model endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Completion endpoint
    ///
    /// URLs containing `anthropic.com` use the Anthropic messages format,
    /// everything else is treated as OpenAI-compatible.
    pub api_url: String,

    /// Model identifier passed through to the API
    pub model: String,

    /// Name of the environment variable holding the API key
    ///
    /// The key itself is never stored in the config file.
    pub api_key_env: String,

    /// Request timeout in seconds
    ///
    /// The core has no timeout of its own, so a hung model call would
    /// otherwise block the turn indefinitely.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com/v1/messages".into(),
            model: "claude-3-haiku-20240307".into(),
            api_key_env: "LLM_API_KEY".into(),
            timeout_secs: 30,
        }
    }
}

/// Which event store backend to open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Volatile store, lost on exit
    #[default]
    Memory,
    /// SQLite database file
    Sqlite,
}

/// Settings for the event store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Database file for the sqlite backend (ignored by the memory backend)
    pub path: PathBuf,

    /// How long a SQLite call waits on a locked database before failing
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            path: PathBuf::from("scheduler.db"),
            busy_timeout_ms: 5000,
        }
    }
}

/// Settings for the tracing subscriber
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG` when set
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "schedule_assistant=info".into(),
        }
    }
}

impl AssistantConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AssistantConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScheduleError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_url.trim().is_empty() {
            return Err(ScheduleError::ConfigError("llm.api_url must not be empty".into()));
        }

        if self.llm.api_key_env.trim().is_empty() {
            return Err(ScheduleError::ConfigError(
                "llm.api_key_env must name an environment variable".into(),
            ));
        }

        if self.llm.timeout_secs == 0 {
            return Err(ScheduleError::ConfigError(
                "llm.timeout_secs must be positive".into(),
            ));
        }

        if self.store.backend == StoreBackend::Sqlite && self.store.path.as_os_str().is_empty() {
            return Err(ScheduleError::ConfigError(
                "store.path is required for the sqlite backend".into(),
            ));
        }

        Ok(())
    }
}
