//! Error types for configuration loading and querying.

use std::path::PathBuf;

/// Errors that can occur when loading or querying the cache configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration was queried while caching is disabled.
    #[error("cache configuration is disabled")]
    Disabled,

    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration {path}: {source}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// The configured hash algorithm is not supported.
    #[error("unsupported hash algorithm '{0}'")]
    UnsupportedHashAlgorithm(String),
}
