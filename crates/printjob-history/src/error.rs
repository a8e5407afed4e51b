use std::path::PathBuf;
use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Failed to initialize storage at '{path}': {source}")]
    StorageInit {
        path: PathBuf,
        #[source]
        source: DatabaseError,
    },

    #[error("Failed to write print job: {0}")]
    StorageWrite(#[source] DatabaseError),

    #[error("Failed to read print jobs: {0}")]
    StorageRead(#[source] DatabaseError),

    #[error("Print job not found: {id}")]
    NotFound { id: i64 },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    Parse {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported export type: {0}")]
    UnsupportedExport(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl HistoryError {
    /// Maps a write-path database error, keeping missing ids distinguishable.
    pub(crate) fn from_write(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { id } => HistoryError::NotFound { id },
            other => HistoryError::StorageWrite(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to bridge log records: {0}")]
    LogBridge(#[from] log::SetLoggerError),

    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

pub type Result<T> = std::result::Result<T, HistoryError>;
