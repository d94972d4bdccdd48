//! Fingerprint calculation for build units.
//!
//! A fingerprint is assembled in a fixed order, which is itself part of the
//! checksum contract: the canonical effective model first, then the input
//! files in sorted path order, then the dependency contributions in sorted
//! key order. Results are memoized per unit for the lifetime of the
//! calculator, which may be shared between threads.

use std::iter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use cairn_config::CacheConfig;
use cairn_model::{BuildInfo, Model, Project, ProjectKey, ProjectsInputInfo};
use dashmap::DashMap;
use tracing::{debug, info};

use crate::baseline::{BaselineComparison, BaselineVerdict};
use crate::dependency::resolve_dependencies;
use crate::digest::{dependency_item, file_item, pom_item};
use crate::effective::effective_pom;
use crate::error::ChecksumError;
use crate::scan::ConfigScanResolver;
use crate::services::{ArtifactResolver, BaselineRepository, MultiModuleSupport, NormalizedModelProvider};
use crate::walker::{absolute_path, PathWalker};

/// Unit property overriding the file-name glob.
pub const CACHE_INPUT_GLOB_PROPERTY: &str = "remote.cache.input.glob";

/// Unit property switching plugin configuration probing on or off.
pub const CACHE_PROCESS_PLUGINS_PROPERTY: &str = "remote.cache.processPlugins";

/// Prefix of unit properties naming extra input paths.
pub const CACHE_INPUT_PROPERTY_PREFIX: &str = "remote.cache.input";

/// Prefix of unit properties naming extra excluded paths.
pub const CACHE_EXCLUDE_PROPERTY_PREFIX: &str = "remote.cache.exclude";

/// Counters describing the work a calculator has done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalculatorStats {
    /// Fingerprints actually computed.
    pub calculations: usize,
    /// Requests answered from the memo.
    pub cache_hits: usize,
    /// Directory walks performed.
    pub walks: usize,
}

/// Units whose fingerprint is being computed on the current call chain.
#[derive(Debug, Default)]
struct InProgress {
    chain: Vec<ProjectKey>,
}

impl InProgress {
    fn enter(&mut self, key: &ProjectKey) -> Result<(), ChecksumError> {
        if self.chain.contains(key) {
            let cycle = self
                .chain
                .iter()
                .skip_while(|k| *k != key)
                .chain(iter::once(key))
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(ChecksumError::DependencyCycle { cycle });
        }
        self.chain.push(key.clone());
        Ok(())
    }

    fn leave(&mut self) {
        self.chain.pop();
    }
}

/// Computes and memoizes unit fingerprints.
pub struct ProjectInputCalculator {
    config: CacheConfig,
    models: Box<dyn NormalizedModelProvider>,
    modules: Box<dyn MultiModuleSupport>,
    resolver: Box<dyn ArtifactResolver>,
    baseline: Option<Box<dyn BaselineRepository>>,
    checksums: DashMap<ProjectKey, ProjectsInputInfo>,
    verdicts: DashMap<ProjectKey, BaselineVerdict>,
    calculations: AtomicUsize,
    cache_hits: AtomicUsize,
    walks: AtomicUsize,
}

impl std::fmt::Debug for ProjectInputCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectInputCalculator")
            .field("config", &self.config)
            .field("memoized", &self.checksums.len())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl ProjectInputCalculator {
    /// Creates a calculator over the given configuration and services.
    pub fn new(
        config: CacheConfig,
        models: impl NormalizedModelProvider + 'static,
        modules: impl MultiModuleSupport + 'static,
        resolver: impl ArtifactResolver + 'static,
    ) -> Self {
        Self {
            config,
            models: Box::new(models),
            modules: Box::new(modules),
            resolver: Box::new(resolver),
            baseline: None,
            checksums: DashMap::new(),
            verdicts: DashMap::new(),
            calculations: AtomicUsize::new(0),
            cache_hits: AtomicUsize::new(0),
            walks: AtomicUsize::new(0),
        }
    }

    /// Enables advisory baseline comparison against records from `repository`.
    ///
    /// Comparison only runs when the configuration has baseline diffing enabled.
    pub fn with_baseline(mut self, repository: impl BaselineRepository + 'static) -> Self {
        self.baseline = Some(Box::new(repository));
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Work counters so far.
    pub fn stats(&self) -> CalculatorStats {
        CalculatorStats {
            calculations: self.calculations.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            walks: self.walks.load(Ordering::Relaxed),
        }
    }

    /// The memoized fingerprint of a unit, if already computed.
    pub fn cached(&self, key: &ProjectKey) -> Option<ProjectsInputInfo> {
        self.checksums.get(key).map(|entry| entry.value().clone())
    }

    /// The baseline verdict recorded when the unit was fingerprinted.
    pub fn baseline_verdict(&self, key: &ProjectKey) -> Option<BaselineVerdict> {
        self.verdicts.get(key).map(|entry| *entry.value())
    }

    /// Returns the fingerprint of `project`, computing it on first request.
    ///
    /// Sibling units the project depends on are fingerprinted recursively.
    /// Fails on unreadable inputs, unresolvable dependencies and dependency
    /// cycles.
    pub fn calculate_input(&self, project: &Project) -> Result<ProjectsInputInfo, ChecksumError> {
        let mut in_progress = InProgress::default();
        self.calculate_in(project, &mut in_progress)
    }

    /// Fingerprints `project` and wraps the result in a build record.
    pub fn build_info(&self, project: &Project) -> Result<BuildInfo, ChecksumError> {
        let info = self.calculate_input(project)?;
        Ok(BuildInfo::new(self.config.hash_algorithm()?.name(), info))
    }

    fn calculate_in(&self, project: &Project, in_progress: &mut InProgress) -> Result<ProjectsInputInfo, ChecksumError> {
        let key = project.key();
        if let Some(cached) = self.cached(&key) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!(project = %key, "fingerprint cache hit");
            return Ok(cached);
        }

        in_progress.enter(&key)?;
        let result = self.compute(project, &key, in_progress);
        in_progress.leave();
        let info = result?;

        self.calculations.fetch_add(1, Ordering::Relaxed);
        // Another thread may have finished the same unit first; its result wins.
        Ok(self.checksums.entry(key).or_insert(info).value().clone())
    }

    fn compute(
        &self,
        project: &Project,
        key: &ProjectKey,
        in_progress: &mut InProgress,
    ) -> Result<ProjectsInputInfo, ChecksumError> {
        let started = Instant::now();
        let algorithm = self.config.hash_algorithm()?;
        let base_dir = absolute_path(&project.base_dir);
        let model = self.models.normalized_model(project)?;

        let effective_pom = effective_pom(&model, &base_dir, &self.config)?;
        let files = self.input_files(project, &model, &base_dir)?;
        let dependencies = resolve_dependencies(
            &model.dependencies,
            self.modules.as_ref(),
            self.resolver.as_ref(),
            algorithm,
            |sibling| Ok(self.calculate_in(sibling, in_progress)?.checksum().to_string()),
        )?;
        let input_elapsed = started.elapsed();

        let started = Instant::now();
        let count = 1 + files.len() + dependencies.len();
        let mut checksum = algorithm.create_checksum(count);
        let baseline = self.find_baseline(project, algorithm.name())?;
        let mut comparison = baseline
            .as_ref()
            .map(|b| BaselineComparison::new(&b.projects_input_info));

        let mut items = Vec::with_capacity(count);
        let pom = pom_item(&mut checksum, &effective_pom)?;
        if let Some(comparison) = comparison.as_mut() {
            comparison.check_pom(&pom);
        }
        items.push(pom);

        for file in &files {
            let item = file_item(&mut checksum, &base_dir, file)?;
            if let Some(comparison) = comparison.as_mut() {
                comparison.check_item(&item);
            }
            items.push(item);
        }

        for dependency in dependencies.values() {
            let item = dependency_item(&mut checksum, &dependency.key, &dependency.hash)?;
            if let Some(comparison) = comparison.as_mut() {
                comparison.check_item(&item);
            }
            items.push(item);
        }

        let info = ProjectsInputInfo::new(checksum.digest()?, items);
        if let Some(comparison) = comparison {
            self.verdicts.insert(key.clone(), comparison.finish());
        }

        for item in info.items() {
            debug!(kind = %item.item_type(), hash = item.hash(), "hash calculated");
        }
        info!(
            project = %key,
            algorithm = %algorithm,
            checksum = info.checksum(),
            input_ms = input_elapsed.as_millis() as u64,
            checksum_ms = started.elapsed().as_millis() as u64,
            "project inputs calculated"
        );
        Ok(info)
    }

    fn find_baseline(&self, project: &Project, algorithm: &str) -> Result<Option<BuildInfo>, ChecksumError> {
        if !self.config.is_baseline_diff_enabled()? {
            return Ok(None);
        }
        let Some(repository) = self.baseline.as_ref() else {
            return Ok(None);
        };
        let Some(baseline) = repository.find_baseline_build(project) else {
            info!(project = %project.key(), "no baseline build found");
            return Ok(None);
        };
        if baseline.hash_function != algorithm {
            info!(
                project = %project.key(),
                baseline = baseline.hash_function.as_str(),
                current = algorithm,
                "baseline uses a different hash algorithm, skipping comparison"
            );
            return Ok(None);
        }
        Ok(Some(baseline))
    }

    fn input_files(&self, project: &Project, model: &Model, base_dir: &Path) -> Result<Vec<PathBuf>, ChecksumError> {
        if model.packaging == "pom" {
            debug!(project = %project.key(), "aggregator unit has no input files");
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let properties = &project.properties;
        let layout = &project.layout;
        let mut walker = PathWalker::new(base_dir);

        walker.exclude(&layout.directory);
        walker.exclude(&layout.output_directory);
        walker.exclude(&layout.test_output_directory);
        for exclude in self.config.global_excludes()? {
            walker.exclude(exclude);
        }
        for (name, value) in properties {
            if name.starts_with(CACHE_EXCLUDE_PROPERTY_PREFIX) {
                walker.exclude(value);
            }
        }

        let glob = match properties.get(CACHE_INPUT_GLOB_PROPERTY) {
            Some(glob) => glob.as_str(),
            None => self.config.default_glob()?,
        };

        walker.start_walk(&layout.source_directory, glob, true)?;
        for resource in &layout.resources {
            walker.start_walk(resource, glob, true)?;
        }
        walker.start_walk(&layout.test_source_directory, glob, true)?;
        for resource in &layout.test_resources {
            walker.start_walk(resource, glob, true)?;
        }

        for (name, value) in properties {
            if name.starts_with(CACHE_INPUT_PROPERTY_PREFIX) && name != CACHE_INPUT_GLOB_PROPERTY {
                walker.start_walk(Path::new(value), glob, true)?;
            }
        }

        for include in self.config.global_includes()? {
            let include_glob = include.glob.as_deref().filter(|g| !g.is_empty()).unwrap_or(glob);
            walker.start_walk(Path::new(&include.path), include_glob, include.recursive)?;
        }
        let known_paths_elapsed = started.elapsed();

        let process_plugins = match properties.get(CACHE_PROCESS_PLUGINS_PROPERTY) {
            Some(value) => value.trim().eq_ignore_ascii_case("true"),
            None => self.config.is_process_plugins()?,
        };
        if process_plugins {
            info!(project = %project.key(), "scanning plugin configurations for input files");
            self.collect_from_plugins(model, glob, &mut walker)?;
        } else {
            info!(project = %project.key(), "plugin configuration probing is disabled");
        }

        self.walks.fetch_add(walker.walks(), Ordering::Relaxed);
        let files = walker.into_sorted_files();
        info!(
            project = %project.key(),
            files = files.len(),
            project_dirs_ms = known_paths_elapsed.as_millis() as u64,
            plugins_ms = (started.elapsed() - known_paths_elapsed).as_millis() as u64,
            "found input files"
        );
        debug!(?files, "input files");
        Ok(files)
    }

    fn collect_from_plugins(&self, model: &Model, glob: &str, walker: &mut PathWalker) -> Result<(), ChecksumError> {
        for plugin in &model.build.plugins {
            let scan = self.config.plugin_dir_scan_config(plugin)?;
            if scan.is_skip() {
                debug!(plugin = plugin.artifact_id.as_str(), "skipping plugin config scan (skip by config)");
                continue;
            }

            debug!(plugin = plugin.artifact_id.as_str(), "processing plugin config");
            if let Some(configuration) = &plugin.configuration {
                ConfigScanResolver::new(&scan, glob).scan(configuration, walker)?;
            }

            for execution in &plugin.executions {
                let merged = scan.merge_with(&self.config.execution_dir_scan_config(plugin, execution)?);
                if merged.is_skip() {
                    debug!(
                        plugin = plugin.artifact_id.as_str(),
                        execution = execution.id.as_str(),
                        "skipping plugin execution config scan (skip by config)"
                    );
                    continue;
                }
                debug!(
                    plugin = plugin.artifact_id.as_str(),
                    execution = execution.id.as_str(),
                    "processing plugin execution config"
                );
                if let Some(configuration) = &execution.configuration {
                    ConfigScanResolver::new(&merged, glob).scan(configuration, walker)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> ProjectKey {
        ProjectKey::new("g", name, "1")
    }

    #[test]
    fn cycle_names_the_chain() {
        let mut in_progress = InProgress::default();
        in_progress.enter(&key("a")).unwrap();
        in_progress.enter(&key("b")).unwrap();
        let err = in_progress.enter(&key("a")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "dependency cycle detected: g:a:1 -> g:b:1 -> g:a:1"
        );
    }

    #[test]
    fn leaving_allows_reentry() {
        let mut in_progress = InProgress::default();
        in_progress.enter(&key("a")).unwrap();
        in_progress.leave();
        assert!(in_progress.enter(&key("a")).is_ok());
    }
}
