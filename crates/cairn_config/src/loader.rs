//! Configuration file loading.

use std::path::Path;

use tracing::{info, warn};

use crate::config::CacheConfig;
use crate::error::ConfigError;
use crate::types::CacheFile;

/// Loads the cache configuration from a TOML file.
///
/// A missing file yields a disabled configuration rather than an error, so
/// builds without cache configuration keep working.
pub fn load_config(path: &Path) -> Result<CacheConfig, ConfigError> {
    if !path.exists() {
        warn!(path = %path.display(), "cache configuration not found, caching disabled");
        return Ok(CacheConfig::disabled());
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = load_config_from_str(&content)?;
    if config.is_enabled() {
        info!(path = %path.display(), "loaded cache configuration");
    } else {
        info!(path = %path.display(), "caching disabled by configuration");
    }
    Ok(config)
}

/// Parses the cache configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<CacheConfig, ConfigError> {
    let file: CacheFile =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    CacheConfig::initialize(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_common::HashAlgorithm;

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert!(config.is_enabled());
        assert_eq!(config.hash_algorithm().unwrap(), HashAlgorithm::Xx);
        assert!(!config.is_baseline_diff_enabled().unwrap());
        assert!(config.global_includes().unwrap().is_empty());
    }

    #[test]
    fn explicit_glob() {
        let config = load_config_from_str("[input.global]\nglob = \"{*.java,*.xml}\"\n").unwrap();
        assert_eq!(config.default_glob().unwrap(), "{*.java,*.xml}");
    }

    #[test]
    fn disabled_by_flag() {
        let config = load_config_from_str("[cache]\nenabled = false\n").unwrap();
        assert!(!config.is_enabled());
    }

    #[test]
    fn unknown_algorithm_rejected() {
        let err = load_config_from_str("[cache]\nhash_algorithm = \"MD5\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedHashAlgorithm(name) if name == "MD5"));
    }

    #[test]
    fn invalid_toml_rejected() {
        let err = load_config_from_str("[cache\nenabled = true").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_scan_mode_rejected() {
        let toml = r#"
[[input.plugins]]
artifact_id = "p"
[input.plugins.dir_scan]
mode = "sometimes"
"#;
        assert!(matches!(load_config_from_str(toml), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn missing_file_is_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("cache.toml")).unwrap();
        assert!(!config.is_enabled());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.toml");
        std::fs::write(&path, "[cache]\nhash_algorithm = \"BLAKE3\"\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.hash_algorithm().unwrap(), HashAlgorithm::Blake3);
    }
}
