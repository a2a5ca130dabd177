//! Error types for persistence and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for session store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while writing or enumerating session records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed.
    #[error("{action} {}: {source}", .path.display())]
    Io {
        /// What was being attempted.
        action: &'static str,
        /// The file or directory involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The session could not be encoded.
    #[error("could not encode session: {0}")]
    Encode(#[from] serde_json::Error),

    /// The identifier cannot name a record.
    #[error("invalid session id: {0}")]
    InvalidId(String),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No usable credential: the file was missing, or the key is blank or the
    /// placeholder.
    #[error("no API key configured; edit {} and set api_key", .path.display())]
    NotConfigured {
        /// The configuration file to edit.
        path: PathBuf,
    },

    /// The configuration file could not be read or written.
    #[error("{action} {}: {source}", .path.display())]
    Io {
        /// What was being attempted.
        action: &'static str,
        /// The configuration file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML.
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        /// The configuration file.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },

    /// The default configuration could not be encoded.
    #[error("could not encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}
