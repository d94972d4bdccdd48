//! File-backed build record store.
//!
//! Records live at `<root>/<groupId>/<artifactId>/buildinfo.json`, one per
//! unit. The version is not part of the location: the latest record of a unit
//! is its baseline regardless of which version produced it.

use std::fs;
use std::path::{Path, PathBuf};

use cairn_checksum::BaselineRepository;
use cairn_config::CacheConfig;
use cairn_model::{BuildInfo, Project, ProjectKey};
use tracing::{debug, info, warn};

use crate::error::CacheError;

/// Name of the record file within a unit's directory.
pub const BUILD_INFO_FILE: &str = "buildinfo.json";

const FILE_SCHEME: &str = "file://";

/// Build records stored under a local directory.
#[derive(Debug, Clone)]
pub struct BuildStore {
    root: PathBuf,
}

impl BuildStore {
    /// Creates a store rooted at `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a store from a baseline location: a plain path or a `file://` URL.
    pub fn from_location(location: &str) -> Result<Self, CacheError> {
        let location = location.trim();
        if let Some(path) = location.strip_prefix(FILE_SCHEME) {
            return Ok(Self::new(path));
        }
        if location.is_empty() || location.contains("://") {
            return Err(CacheError::UnsupportedLocation {
                location: location.to_string(),
            });
        }
        Ok(Self::new(location))
    }

    /// The store for the configured baseline location, if baseline diffing is enabled.
    pub fn for_baseline(config: &CacheConfig) -> Result<Option<Self>, CacheError> {
        match config.baseline_url()? {
            Some(location) => {
                let store = Self::from_location(location)?;
                info!(root = %store.root.display(), "using local baseline build records");
                Ok(Some(store))
            }
            None => Ok(None),
        }
    }

    /// The store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the record for `key`.
    pub fn record_path(&self, key: &ProjectKey) -> PathBuf {
        self.root
            .join(&key.group_id)
            .join(&key.artifact_id)
            .join(BUILD_INFO_FILE)
    }

    /// Writes the record of `key`, replacing any previous one.
    ///
    /// Creates the unit directory if it doesn't exist.
    pub fn save(&self, key: &ProjectKey, record: &BuildInfo) -> Result<PathBuf, CacheError> {
        let path = self.record_path(key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| CacheError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(record).map_err(|e| CacheError::Serialization {
            project: key.to_string(),
            reason: e.to_string(),
        })?;
        fs::write(&path, json).map_err(|e| CacheError::Io {
            path: path.clone(),
            source: e,
        })?;
        debug!(project = %key, path = %path.display(), "build record saved");
        Ok(path)
    }

    /// Reads the record of `key`.
    ///
    /// Fail-safe: returns `None` if the record doesn't exist or can't be parsed.
    pub fn load(&self, key: &ProjectKey) -> Option<BuildInfo> {
        let path = self.record_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!(project = %key, path = %path.display(), error = %e, "no readable build record");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(project = %key, path = %path.display(), error = %e, "ignoring corrupt build record");
                None
            }
        }
    }
}

impl BaselineRepository for BuildStore {
    fn find_baseline_build(&self, project: &Project) -> Option<BuildInfo> {
        self.load(&project.key())
    }
}
