//! Dependency fingerprints.
//!
//! Only dependencies that can change between builds contribute to a
//! fingerprint: sibling units of the same build (through their own
//! fingerprint) and external snapshots (through their artifact content).
//! Released external artifacts are immutable and `pom` dependencies are
//! already reflected in the effective model, so both are skipped.

use std::collections::BTreeMap;

use cairn_common::HashAlgorithm;
use cairn_model::{Dependency, Project};
use tracing::debug;

use crate::error::ChecksumError;
use crate::services::{ArtifactResolver, MultiModuleSupport};

/// The fingerprint contribution of one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    /// Reference recorded in the digest item: `group:artifact:type[:classifier]:version`.
    pub key: String,
    /// Hex digest folded into the unit checksum.
    pub hash: String,
}

/// Resolves the fingerprint contributions of `dependencies`.
///
/// Siblings are looked up before the snapshot check, so a sibling is always
/// fingerprinted through `sibling_checksum`, whatever its version. The result
/// is keyed and ordered by the versionless dependency key.
pub fn resolve_dependencies<F>(
    dependencies: &[Dependency],
    modules: &dyn MultiModuleSupport,
    resolver: &dyn ArtifactResolver,
    algorithm: HashAlgorithm,
    mut sibling_checksum: F,
) -> Result<BTreeMap<String, ResolvedDependency>, ChecksumError>
where
    F: FnMut(&Project) -> Result<String, ChecksumError>,
{
    let mut resolved = BTreeMap::new();
    for dependency in dependencies {
        if dependency.is_pom() {
            debug!(dependency = %dependency, "skipping pom dependency");
            continue;
        }

        let hash = match modules.try_to_resolve_project(
            &dependency.group_id,
            &dependency.artifact_id,
            &dependency.version,
        ) {
            Some(sibling) => {
                debug!(dependency = %dependency, "fingerprinting sibling unit");
                sibling_checksum(&sibling)?
            }
            None if !dependency.is_snapshot() => {
                debug!(dependency = %dependency, "skipping immutable external dependency");
                continue;
            }
            None => snapshot_checksum(dependency, resolver, algorithm)?,
        };

        resolved.insert(
            dependency.versionless_key(),
            ResolvedDependency {
                key: dependency.to_string(),
                hash,
            },
        );
    }
    Ok(resolved)
}

fn snapshot_checksum(
    dependency: &Dependency,
    resolver: &dyn ArtifactResolver,
    algorithm: HashAlgorithm,
) -> Result<String, ChecksumError> {
    let wrap = |reason: String| ChecksumError::DependencyResolution {
        dependency: dependency.to_string(),
        reason,
    };
    let path = resolver.resolve(dependency).map_err(|e| match e {
        ChecksumError::DependencyResolution { .. } => e,
        other => wrap(other.to_string()),
    })?;
    debug!(dependency = %dependency, path = %path.display(), "hashing snapshot artifact");
    algorithm
        .hash_file(&path)
        .map_err(|e| wrap(format!("cannot read {}: {e}", path.display())))
}
