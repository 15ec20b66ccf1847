use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
