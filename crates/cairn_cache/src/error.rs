//! Error types for build record storage.

use std::path::PathBuf;

/// Errors that can occur while writing build records.
///
/// Reads never surface these: a record that cannot be read or parsed is
/// treated as absent.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while writing a record.
    #[error("build record I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A record could not be serialized.
    #[error("failed to serialize build record for {project}: {reason}")]
    Serialization {
        /// Identity of the unit the record belongs to.
        project: String,
        /// Description of the serialization failure.
        reason: String,
    },

    /// The configuration could not be read.
    #[error(transparent)]
    Config(#[from] cairn_config::ConfigError),

    /// The baseline location is not a local directory.
    #[error("unsupported baseline location: {location}")]
    UnsupportedLocation {
        /// The configured location.
        location: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = CacheError::Io {
            path: PathBuf::from("/builds/org.acme/app/buildinfo.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("build record I/O error"));
        assert!(msg.contains("buildinfo.json"));
    }

    #[test]
    fn serialization_display() {
        let err = CacheError::Serialization {
            project: "org.acme:app:1.0".to_string(),
            reason: "key must be a string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to serialize build record for org.acme:app:1.0: key must be a string"
        );
    }

    #[test]
    fn unsupported_location_display() {
        let err = CacheError::UnsupportedLocation {
            location: "https://cache.example.com".to_string(),
        };
        assert!(err.to_string().contains("https://cache.example.com"));
    }
}
