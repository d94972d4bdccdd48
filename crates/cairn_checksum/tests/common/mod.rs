//! Shared fixtures for fingerprinting integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use cairn_checksum::{EffectiveModels, LocalRepository, ProjectInputCalculator, Reactor};
use cairn_config::{load_config_from_str, CacheConfig};
use cairn_model::{Dependency, Model, Project};
use tempfile::TempDir;

pub const GROUP: &str = "org.acme";
pub const VERSION: &str = "1.0-SNAPSHOT";

/// A temporary multi-unit checkout.
///
/// Units live below a non-hidden `ws` directory because temporary directory
/// names start with a dot.
pub struct Workspace {
    _dir: TempDir,
    pub root: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("ws");
        fs::create_dir_all(&root).unwrap();
        Self { _dir: dir, root }
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    pub fn unit_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn project(&self, name: &str) -> Project {
        Project::new(self.unit_dir(name), Model::new(GROUP, name, VERSION))
    }

    pub fn repository(&self) -> LocalRepository {
        LocalRepository::new(self.root.join("repo"))
    }
}

pub fn sibling(name: &str) -> Dependency {
    Dependency::new(GROUP, name, VERSION)
}

pub fn config(toml: &str) -> CacheConfig {
    load_config_from_str(toml).unwrap()
}

pub fn calculator(ws: &Workspace, config: CacheConfig, projects: &[Project]) -> ProjectInputCalculator {
    ProjectInputCalculator::new(
        config,
        EffectiveModels,
        Reactor::new(projects.iter().cloned()),
        ws.repository(),
    )
}

pub fn file_values(info: &cairn_model::ProjectsInputInfo) -> Vec<String> {
    info.items_of(cairn_model::DigestType::File)
        .map(|i| i.value().to_string())
        .collect()
}

pub fn relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base).unwrap().to_string_lossy().replace('\\', "/")
}
