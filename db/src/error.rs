//! Error types for store configuration.

use thiserror::Error;

/// Errors that can occur while loading configuration or parsing a
/// connection string.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Connection string is empty or malformed.
    #[error("invalid database url '{0}'")]
    InvalidUrl(String),

    /// Connection string names a backend other than SQLite.
    #[error("unsupported database scheme '{0}': only sqlite is supported")]
    UnsupportedScheme(String),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
