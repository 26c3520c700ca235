use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors raised by the key-value store and the session repository.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("stored value under `{key}` is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize sessions: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("import file is not valid JSON: {0}")]
    ImportParse(#[source] serde_json::Error),
    #[error("invalid backup file: expected a JSON array of sessions")]
    ImportNotArray,
    #[error("no sessions to export")]
    NothingToExport,
}

/// Validation failures when starting a session from pasted text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("please paste content into both the {label_a} and {label_b} text areas")]
    MissingText { label_a: String, label_b: String },
    #[error("could not extract any content from the {label} text")]
    NoContent { label: String },
}

/// Top-level error for the binary: configuration, storage and window startup.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Gui(#[from] eframe::Error),
    #[error("session {0} not found")]
    SessionNotFound(i64),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
