//! Error types for fingerprint calculation.

use std::path::PathBuf;

use cairn_common::HashError;
use cairn_config::ConfigError;

/// Errors that abort a fingerprint calculation.
///
/// No partial fingerprint is ever returned alongside one of these.
#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    /// An input file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A unit's fingerprint was requested while it was already being computed.
    #[error("dependency cycle detected: {cycle}")]
    DependencyCycle {
        /// The chain of units, ending with the repeated one.
        cycle: String,
    },

    /// A dependency could not be resolved or fingerprinted.
    #[error("cannot resolve dependency {dependency}: {reason}")]
    DependencyResolution {
        /// The dependency coordinates.
        dependency: String,
        /// Why resolution failed.
        reason: String,
    },

    /// The effective model of a unit is missing or malformed.
    #[error("invalid effective model of {project}: {reason}")]
    Model {
        /// The unit identity.
        project: String,
        /// What is wrong with the model.
        reason: String,
    },

    /// A configured or unit-level glob could not be compiled.
    #[error("invalid glob '{glob}': {reason}")]
    InvalidGlob {
        /// The offending glob.
        glob: String,
        /// Why compilation failed.
        reason: String,
    },

    /// The cache configuration could not answer a query.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A checksum precondition was violated.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// The effective model could not be serialized.
    #[error("failed to serialize effective model: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ChecksumError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ChecksumError::Io {
            path: path.into(),
            source,
        }
    }
}
