//! Services the surrounding build tool provides to the calculator.
//!
//! Each trait has a small implementation usable on its own: [`EffectiveModels`]
//! takes a unit's model as already effective, [`Reactor`] looks siblings up in
//! a fixed set of units, and [`LocalRepository`] resolves artifacts from a
//! repository directory laid out by coordinates.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cairn_model::{BuildInfo, Dependency, Model, Project, ProjectKey};

use crate::error::ChecksumError;

/// Supplies the effective (fully inherited and resolved) model of a unit.
pub trait NormalizedModelProvider: Send + Sync {
    /// Returns the effective model of `project`.
    fn normalized_model(&self, project: &Project) -> Result<Model, ChecksumError>;
}

/// Looks up units that belong to the current multi-unit build.
pub trait MultiModuleSupport: Send + Sync {
    /// Returns the sibling unit with these coordinates, if it is part of the build.
    fn try_to_resolve_project(&self, group_id: &str, artifact_id: &str, version: &str) -> Option<Project>;
}

/// Provides previously recorded builds to compare against.
pub trait BaselineRepository: Send + Sync {
    /// Returns the baseline build of `project`, if one is recorded and readable.
    fn find_baseline_build(&self, project: &Project) -> Option<BuildInfo>;
}

/// Resolves external dependency artifacts to local files.
pub trait ArtifactResolver: Send + Sync {
    /// Returns the path of the artifact file for `dependency`.
    fn resolve(&self, dependency: &Dependency) -> Result<PathBuf, ChecksumError>;
}

/// Treats every unit's model as already effective.
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectiveModels;

impl NormalizedModelProvider for EffectiveModels {
    fn normalized_model(&self, project: &Project) -> Result<Model, ChecksumError> {
        let model = &project.model;
        for (field, value) in [
            ("group id", &model.group_id),
            ("artifact id", &model.artifact_id),
            ("version", &model.version),
        ] {
            if value.trim().is_empty() {
                return Err(ChecksumError::Model {
                    project: project.key().to_string(),
                    reason: format!("missing {field}"),
                });
            }
        }
        Ok(model.clone())
    }
}

/// The units of one multi-unit build, keyed by identity.
#[derive(Debug, Clone, Default)]
pub struct Reactor {
    projects: HashMap<ProjectKey, Project>,
}

impl Reactor {
    /// Creates a reactor from a set of units.
    pub fn new(projects: impl IntoIterator<Item = Project>) -> Self {
        Self {
            projects: projects.into_iter().map(|p| (p.key(), p)).collect(),
        }
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Returns `true` if the reactor holds no units.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl MultiModuleSupport for Reactor {
    fn try_to_resolve_project(&self, group_id: &str, artifact_id: &str, version: &str) -> Option<Project> {
        self.projects
            .get(&ProjectKey::new(group_id, artifact_id, version))
            .cloned()
    }
}

/// Resolves artifacts from a repository directory.
///
/// Artifacts live at `<root>/<group path>/<artifactId>/<version>/<artifactId>-<version>[-<classifier>].<ext>`,
/// where the group path is the group id with dots replaced by directory
/// separators.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    /// Creates a resolver over the repository at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the artifact file for `dependency`.
    pub fn artifact_path(&self, dependency: &Dependency) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(dependency.group_id.split('.'));
        path.push(&dependency.artifact_id);
        path.push(&dependency.version);
        let extension = match dependency.type_.as_str() {
            "test-jar" | "ejb" | "maven-plugin" => "jar",
            other => other,
        };
        let file_name = match &dependency.classifier {
            Some(classifier) => format!(
                "{}-{}-{}.{}",
                dependency.artifact_id, dependency.version, classifier, extension
            ),
            None => format!("{}-{}.{}", dependency.artifact_id, dependency.version, extension),
        };
        path.push(file_name);
        path
    }
}

impl ArtifactResolver for LocalRepository {
    fn resolve(&self, dependency: &Dependency) -> Result<PathBuf, ChecksumError> {
        let path = self.artifact_path(dependency);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ChecksumError::DependencyResolution {
                dependency: dependency.to_string(),
                reason: format!("artifact not found at {}", path.display()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reactor_lookup() {
        let reactor = Reactor::new([Project::new("/w/core", Model::new("g", "core", "1.0"))]);
        assert!(reactor.try_to_resolve_project("g", "core", "1.0").is_some());
        assert!(reactor.try_to_resolve_project("g", "core", "2.0").is_none());
        assert_eq!(reactor.len(), 1);
    }

    #[test]
    fn effective_models_rejects_missing_identity() {
        let project = Project::new("/w/x", Model::new("g", "", "1.0"));
        let err = EffectiveModels.normalized_model(&project).unwrap_err();
        assert!(err.to_string().contains("missing artifact id"));
    }

    #[test]
    fn repository_layout() {
        let repo = LocalRepository::new("/repo");
        let dep = Dependency::new("org.acme", "lib", "1.0-SNAPSHOT");
        assert_eq!(
            repo.artifact_path(&dep),
            PathBuf::from("/repo/org/acme/lib/1.0-SNAPSHOT/lib-1.0-SNAPSHOT.jar")
        );
        let tests = dep.with_type("test-jar").with_classifier("tests");
        assert_eq!(
            repo.artifact_path(&tests),
            PathBuf::from("/repo/org/acme/lib/1.0-SNAPSHOT/lib-1.0-SNAPSHOT-tests.jar")
        );
    }

    #[test]
    fn missing_artifact_is_resolution_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LocalRepository::new(dir.path());
        let err = repo.resolve(&Dependency::new("g", "a", "1-SNAPSHOT")).unwrap_err();
        assert!(matches!(err, ChecksumError::DependencyResolution { .. }));
    }

    #[test]
    fn resolves_existing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LocalRepository::new(dir.path());
        let dep = Dependency::new("g", "a", "1-SNAPSHOT");
        let path = repo.artifact_path(&dep);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"jar").unwrap();
        assert_eq!(repo.resolve(&dep).unwrap(), path);
    }
}
