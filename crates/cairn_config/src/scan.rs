//! Plugin configuration probing policy.
//!
//! A [`PluginScanConfig`] decides which configuration tags of a plugin (or of
//! one of its executions) are scanned for input paths, and with which walk
//! settings. Execution-level policies are merged onto the plugin-level policy
//! with [`PluginScanConfig::merge_with`].

use serde::Deserialize;

use crate::types::DirScanConfig;

/// Probing mode of a plugin or execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Scan configuration values for paths.
    Auto,
    /// Do not scan at all.
    Skip,
}

/// Walk settings for one included tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagScanConfig {
    /// Configuration tag name.
    pub tag_name: String,
    /// Whether paths found under this tag are walked recursively.
    #[serde(default = "default_recursive")]
    pub recursive: bool,
    /// Glob override for paths found under this tag.
    #[serde(default)]
    pub glob: Option<String>,
}

fn default_recursive() -> bool {
    true
}

/// Resolved walk settings for a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfigProperties {
    /// Whether subdirectories are walked.
    pub recursive: bool,
    /// Glob override; the unit glob applies when absent.
    pub glob: Option<String>,
}

impl Default for ScanConfigProperties {
    fn default() -> Self {
        Self {
            recursive: true,
            glob: None,
        }
    }
}

/// Composable probing policy for a plugin or execution configuration.
///
/// The default policy accepts every tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginScanConfig {
    mode: Option<ScanMode>,
    ignore_parent: bool,
    includes: Vec<TagScanConfig>,
    excludes: Vec<String>,
}

impl PluginScanConfig {
    /// A policy that accepts every tag.
    pub fn accept_all() -> Self {
        Self::default()
    }

    /// Builds a policy from its configuration-file form.
    pub fn from_dir_scan(dir_scan: &DirScanConfig) -> Self {
        Self {
            mode: dir_scan.mode,
            ignore_parent: dir_scan.ignore_parent,
            includes: dir_scan.includes.clone(),
            excludes: dir_scan.excludes.clone(),
        }
    }

    /// Returns `true` if probing is switched off.
    pub fn is_skip(&self) -> bool {
        self.mode == Some(ScanMode::Skip)
    }

    /// The effective mode, if one was set.
    pub fn mode(&self) -> Option<ScanMode> {
        self.mode
    }

    /// Tags explicitly included.
    pub fn includes(&self) -> &[TagScanConfig] {
        &self.includes
    }

    /// Tags explicitly excluded.
    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    /// Returns `true` if the tag should be scanned.
    ///
    /// With an include list only included tags are accepted; otherwise every
    /// tag not on the exclude list is.
    pub fn accept(&self, tag_name: &str) -> bool {
        if !self.includes.is_empty() {
            return self.includes.iter().any(|t| t.tag_name == tag_name);
        }
        !self.excludes.iter().any(|t| t == tag_name)
    }

    /// Merges an overriding (execution-level) policy onto this one.
    ///
    /// An override with `ignore_parent` replaces this policy outright. Otherwise
    /// the override's mode wins when set and the tag lists are concatenated,
    /// parent entries first.
    pub fn merge_with(&self, overriding: &PluginScanConfig) -> PluginScanConfig {
        if overriding.ignore_parent {
            return overriding.clone();
        }
        let mut includes = self.includes.clone();
        includes.extend(overriding.includes.iter().cloned());
        let mut excludes = self.excludes.clone();
        excludes.extend(overriding.excludes.iter().cloned());
        PluginScanConfig {
            mode: overriding.mode.or(self.mode),
            ignore_parent: false,
            includes,
            excludes,
        }
    }

    /// Walk settings for a tag; defaults to recursive with the unit glob.
    pub fn tag_scan_properties(&self, tag_name: &str) -> ScanConfigProperties {
        self.includes
            .iter()
            .find(|t| t.tag_name == tag_name)
            .map(|t| ScanConfigProperties {
                recursive: t.recursive,
                glob: t.glob.clone(),
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str) -> TagScanConfig {
        TagScanConfig {
            tag_name: name.to_string(),
            recursive: true,
            glob: None,
        }
    }

    #[test]
    fn default_accepts_everything() {
        let config = PluginScanConfig::accept_all();
        assert!(config.accept("anything"));
        assert!(!config.is_skip());
    }

    #[test]
    fn exclude_list_rejects() {
        let config = PluginScanConfig::from_dir_scan(&DirScanConfig {
            excludes: vec!["outputDirectory".to_string()],
            ..Default::default()
        });
        assert!(!config.accept("outputDirectory"));
        assert!(config.accept("sourceDirectory"));
    }

    #[test]
    fn include_list_is_exclusive() {
        let config = PluginScanConfig::from_dir_scan(&DirScanConfig {
            includes: vec![tag("sourceDirectory")],
            ..Default::default()
        });
        assert!(config.accept("sourceDirectory"));
        assert!(!config.accept("testSourceDirectory"));
    }

    #[test]
    fn merge_keeps_parent_excludes() {
        let parent = PluginScanConfig::from_dir_scan(&DirScanConfig {
            excludes: vec!["foo".to_string()],
            ..Default::default()
        });
        let overriding = PluginScanConfig::from_dir_scan(&DirScanConfig {
            includes: vec![tag("bar")],
            ..Default::default()
        });
        let merged = parent.merge_with(&overriding);
        assert_eq!(merged.excludes(), ["foo".to_string()]);
        assert_eq!(merged.includes(), [tag("bar")]);
    }

    #[test]
    fn merge_ignore_parent_replaces() {
        let parent = PluginScanConfig::from_dir_scan(&DirScanConfig {
            mode: Some(ScanMode::Skip),
            excludes: vec!["foo".to_string()],
            ..Default::default()
        });
        let overriding = PluginScanConfig::from_dir_scan(&DirScanConfig {
            ignore_parent: true,
            includes: vec![tag("bar")],
            ..Default::default()
        });
        let merged = parent.merge_with(&overriding);
        assert!(merged.excludes().is_empty());
        assert!(!merged.is_skip());
        assert_eq!(merged.includes(), [tag("bar")]);
    }

    #[test]
    fn merge_mode_inherits_unless_overridden() {
        let parent = PluginScanConfig::from_dir_scan(&DirScanConfig {
            mode: Some(ScanMode::Skip),
            ..Default::default()
        });
        assert!(parent.merge_with(&PluginScanConfig::accept_all()).is_skip());

        let overriding = PluginScanConfig::from_dir_scan(&DirScanConfig {
            mode: Some(ScanMode::Auto),
            ..Default::default()
        });
        assert!(!parent.merge_with(&overriding).is_skip());
    }

    #[test]
    fn tag_properties_lookup() {
        let config = PluginScanConfig::from_dir_scan(&DirScanConfig {
            includes: vec![TagScanConfig {
                tag_name: "schemas".to_string(),
                recursive: false,
                glob: Some("*.xsd".to_string()),
            }],
            ..Default::default()
        });
        let props = config.tag_scan_properties("schemas");
        assert!(!props.recursive);
        assert_eq!(props.glob.as_deref(), Some("*.xsd"));
        assert_eq!(config.tag_scan_properties("other"), ScanConfigProperties::default());
    }
}
