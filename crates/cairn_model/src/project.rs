//! The build-unit model: projects, their effective models and dependencies.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::node::ConfigTree;

/// Packaging / dependency type of aggregator units.
const POM_TYPE: &str = "pom";

/// Suffix marking a mutable version.
const SNAPSHOT_SUFFIX: &str = "SNAPSHOT";

/// Timestamped snapshot form: `<base>-yyyyMMdd.HHmmss-<build>`.
static TIMESTAMPED_SNAPSHOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*)-(\d{8}\.\d{6})-(\d+)$").expect("timestamped snapshot pattern is valid")
});

/// Returns `true` if `version` denotes a mutable snapshot.
pub fn is_snapshot_version(version: &str) -> bool {
    version.ends_with(SNAPSHOT_SUFFIX) || TIMESTAMPED_SNAPSHOT.is_match(version)
}

/// Stable identity of a build unit: `groupId:artifactId:version`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectKey {
    /// Group identifier.
    pub group_id: String,
    /// Artifact identifier.
    pub artifact_id: String,
    /// Version.
    pub version: String,
}

impl ProjectKey {
    /// Creates a key from its three coordinates.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

fn default_type() -> String {
    "jar".to_string()
}

fn default_packaging() -> String {
    "jar".to_string()
}

/// A declared dependency of a unit or plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Group identifier.
    pub group_id: String,
    /// Artifact identifier.
    pub artifact_id: String,
    /// Version (possibly a snapshot).
    pub version: String,
    /// Artifact type, `jar` unless stated otherwise.
    #[serde(rename = "type", default = "default_type")]
    pub type_: String,
    /// Optional classifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    /// Optional scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Dependency {
    /// Creates a `jar` dependency without classifier or scope.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            type_: default_type(),
            classifier: None,
            scope: None,
        }
    }

    /// Sets the artifact type.
    pub fn with_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = type_.into();
        self
    }

    /// Sets the classifier.
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// Returns `true` for `pom`-typed dependencies.
    pub fn is_pom(&self) -> bool {
        self.type_ == POM_TYPE
    }

    /// Returns `true` if the version is a snapshot.
    pub fn is_snapshot(&self) -> bool {
        is_snapshot_version(&self.version)
    }

    /// Versionless identity: `group:artifact:type[:classifier]`.
    pub fn versionless_key(&self) -> String {
        match &self.classifier {
            Some(classifier) => format!(
                "{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.type_, classifier
            ),
            None => format!("{}:{}:{}", self.group_id, self.artifact_id, self.type_),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.versionless_key(), self.version)
    }
}

/// One execution block of a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PluginExecution {
    /// Execution id.
    pub id: String,
    /// Lifecycle phase the execution is bound to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Goals run by the execution.
    #[serde(default)]
    pub goals: Vec<String>,
    /// Execution-level configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<ConfigTree>,
}

impl PluginExecution {
    /// Creates an execution with no goals or configuration.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// A build plugin with its configuration and executions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Plugin {
    /// Group identifier.
    pub group_id: String,
    /// Artifact identifier.
    pub artifact_id: String,
    /// Version, if pinned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Plugin-level configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<ConfigTree>,
    /// Execution blocks.
    #[serde(default)]
    pub executions: Vec<PluginExecution>,
    /// Plugin dependencies.
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Plugin {
    /// Creates a plugin with no configuration.
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            ..Self::default()
        }
    }
}

/// Plugin section of an effective model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildModel {
    /// Managed plugin declarations.
    #[serde(default)]
    pub plugin_management: Vec<Plugin>,
    /// Active plugins.
    #[serde(default)]
    pub plugins: Vec<Plugin>,
}

/// The effective (fully inherited) build configuration of a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Group identifier.
    pub group_id: String,
    /// Artifact identifier.
    pub artifact_id: String,
    /// Version.
    pub version: String,
    /// Packaging, `jar` unless stated otherwise.
    #[serde(default = "default_packaging")]
    pub packaging: String,
    /// Aggregated child modules.
    #[serde(default)]
    pub modules: Vec<String>,
    /// Declared dependencies.
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    /// Plugin section.
    #[serde(default)]
    pub build: BuildModel,
}

impl Model {
    /// Creates a `jar` model with no modules, dependencies or plugins.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            packaging: default_packaging(),
            modules: Vec::new(),
            dependencies: Vec::new(),
            build: BuildModel::default(),
        }
    }

    /// Returns the identity of this model.
    pub fn key(&self) -> ProjectKey {
        ProjectKey::new(&self.group_id, &self.artifact_id, &self.version)
    }
}

/// Source and output directories of a unit.
///
/// Relative paths are resolved against the unit's base directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildLayout {
    /// Root build output directory.
    pub directory: PathBuf,
    /// Main classes output directory.
    pub output_directory: PathBuf,
    /// Test classes output directory.
    pub test_output_directory: PathBuf,
    /// Main source directory.
    pub source_directory: PathBuf,
    /// Test source directory.
    pub test_source_directory: PathBuf,
    /// Main resource directories.
    #[serde(default)]
    pub resources: Vec<PathBuf>,
    /// Test resource directories.
    #[serde(default)]
    pub test_resources: Vec<PathBuf>,
}

impl Default for BuildLayout {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("target"),
            output_directory: PathBuf::from("target/classes"),
            test_output_directory: PathBuf::from("target/test-classes"),
            source_directory: PathBuf::from("src/main/java"),
            test_source_directory: PathBuf::from("src/test/java"),
            resources: vec![PathBuf::from("src/main/resources")],
            test_resources: vec![PathBuf::from("src/test/resources")],
        }
    }
}

/// A buildable unit within a multi-unit build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Absolute base directory of the unit.
    pub base_dir: PathBuf,
    /// The unit's effective model.
    pub model: Model,
    /// Source and output directories.
    #[serde(default)]
    pub layout: BuildLayout,
    /// Unit properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Project {
    /// Creates a unit with the conventional layout and no properties.
    pub fn new(base_dir: impl Into<PathBuf>, model: Model) -> Self {
        Self {
            base_dir: base_dir.into(),
            model,
            layout: BuildLayout::default(),
            properties: BTreeMap::new(),
        }
    }

    /// Returns the unit identity.
    pub fn key(&self) -> ProjectKey {
        self.model.key()
    }

    /// Returns `true` for aggregator (`pom` packaged) units.
    pub fn is_pom(&self) -> bool {
        self.model.packaging == POM_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_detection() {
        assert!(is_snapshot_version("1.0-SNAPSHOT"));
        assert!(is_snapshot_version("2.3.1-20240105.101530-7"));
        assert!(!is_snapshot_version("1.0"));
        assert!(!is_snapshot_version("1.0-RC1"));
    }

    #[test]
    fn versionless_key_without_classifier() {
        let dep = Dependency::new("g", "a", "1.0");
        assert_eq!(dep.versionless_key(), "g:a:jar");
        assert_eq!(dep.to_string(), "g:a:jar:1.0");
    }

    #[test]
    fn versionless_key_with_classifier() {
        let dep = Dependency::new("g", "a", "1.0")
            .with_type("test-jar")
            .with_classifier("tests");
        assert_eq!(dep.versionless_key(), "g:a:test-jar:tests");
    }

    #[test]
    fn pom_dependency() {
        assert!(Dependency::new("g", "bom", "1").with_type("pom").is_pom());
        assert!(!Dependency::new("g", "lib", "1").is_pom());
    }

    #[test]
    fn project_key_display() {
        let project = Project::new("/work/app", Model::new("com.acme", "app", "1.0-SNAPSHOT"));
        assert_eq!(project.key().to_string(), "com.acme:app:1.0-SNAPSHOT");
        assert!(!project.is_pom());
    }

    #[test]
    fn model_defaults_from_json() {
        let json = r#"{"group_id":"g","artifact_id":"a","version":"1",
            "dependencies":[{"group_id":"g","artifact_id":"d","version":"2"}]}"#;
        let model: Model = serde_json::from_str(json).unwrap();
        assert_eq!(model.packaging, "jar");
        assert_eq!(model.dependencies[0].type_, "jar");
        assert!(model.build.plugins.is_empty());
    }

    #[test]
    fn default_layout_is_conventional() {
        let layout = BuildLayout::default();
        assert_eq!(layout.directory, PathBuf::from("target"));
        assert_eq!(layout.source_directory, PathBuf::from("src/main/java"));
        assert_eq!(layout.resources.len(), 1);
    }
}
