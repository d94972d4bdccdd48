//! The comparison engine.
//!
//! Categories are compared in a fixed order: hash function, effective
//! configuration, completed executions with their tracked properties, input
//! files, then dependencies. File and dependency sets are compared first; when
//! a set differs, one aggregate mismatch is reported and per-item hashes of
//! that category are not compared.
//!
//! Untracked execution properties never produce mismatches. Those selected by
//! the reconciliation `logs`, `nologs` and `log_all` rules are reported in the
//! log when they differ.

use std::collections::{BTreeMap, BTreeSet};

use cairn_config::{CacheConfig, ConfigError, TrackedProperty};
use cairn_model::{BuildInfo, CompletedExecution, Diff, DigestItem, DigestType, Mismatch, ProjectsInputInfo};
use tracing::{debug, info};

/// Compares `current` against `baseline` and returns every discrepancy.
///
/// `config` supplies the reconciliation rules (tracked property skip and
/// default values). A disabled configuration compares without them.
pub fn compare(current: &BuildInfo, baseline: &BuildInfo, config: &CacheConfig) -> Diff {
    CacheDiff::new(current, baseline, config).compare()
}

/// One comparison between a current and a baseline build record.
#[derive(Debug)]
pub struct CacheDiff<'a> {
    current: &'a BuildInfo,
    baseline: &'a BuildInfo,
    config: &'a CacheConfig,
    report: Vec<Mismatch>,
    logged: usize,
}

impl<'a> CacheDiff<'a> {
    /// Prepares a comparison of `current` against `baseline`.
    pub fn new(current: &'a BuildInfo, baseline: &'a BuildInfo, config: &'a CacheConfig) -> Self {
        Self {
            current,
            baseline,
            config,
            report: Vec::new(),
            logged: 0,
        }
    }

    /// Runs every comparison and returns the mismatches in comparison order.
    pub fn compare(mut self) -> Diff {
        let (current, baseline) = (self.current, self.baseline);
        if current.hash_function != baseline.hash_function {
            self.mismatch(
                "hashFunction",
                Some(current.hash_function.clone()),
                Some(baseline.hash_function.clone()),
                "Different algorithms render caches not comparable and cached could not be reused".to_string(),
                "Ensure the same algorithm as remote",
            );
        }

        self.compare_effective_poms(&current.projects_input_info, &baseline.projects_input_info);
        self.compare_executions(&current.executions, &baseline.executions);
        self.compare_files(&current.projects_input_info, &baseline.projects_input_info);
        self.compare_dependencies(&current.projects_input_info, &baseline.projects_input_info);

        info!(
            mismatches = self.report.len(),
            logged_properties = self.logged,
            "baseline comparison finished"
        );
        Diff::new(self.report)
    }

    fn compare_effective_poms(&mut self, current: &ProjectsInputInfo, baseline: &ProjectsInputInfo) {
        let current_hash = current.pom().map(|item| item.hash().to_string());
        let baseline_hash = baseline.pom().map(|item| item.hash().to_string());
        if current_hash != baseline_hash {
            self.mismatch(
                "effectivePom",
                current_hash,
                baseline_hash,
                "Difference in effective pom suggests effectively different builds which cannot be reused".to_string(),
                "Compare raw content of effective poms and eliminate differences. See How-To for common techniques",
            );
        }
    }

    fn compare_executions(&mut self, current: &[CompletedExecution], baseline: &[CompletedExecution]) {
        let current_by_key: BTreeMap<String, &CompletedExecution> =
            current.iter().map(|e| (e.execution_key(), e)).collect();
        let baseline_by_key: BTreeMap<String, &CompletedExecution> =
            baseline.iter().map(|e| (e.execution_key(), e)).collect();

        for execution in baseline {
            let key = execution.execution_key();
            if !current_by_key.contains_key(&key) {
                self.mismatch(
                    &key,
                    None,
                    None,
                    format!("Baseline build contains excessive plugin {key}"),
                    "Different set of plugins produces different build results. \
                     Exclude non-critical plugins or make sure plugin sets match",
                );
            }
        }

        for execution in current {
            let key = execution.execution_key();
            match baseline_by_key.get(&key) {
                Some(baseline) => self.compare_properties(execution, baseline),
                None => self.mismatch(
                    &key,
                    None,
                    None,
                    format!("Cached build doesn't contain plugin {key}"),
                    "Different set of plugins produces different build results. \
                     Filter out non-critical plugins or make sure remote cache always run full build \
                     with all plugins",
                ),
            }
        }
    }

    fn compare_properties(&mut self, current: &CompletedExecution, baseline: &CompletedExecution) {
        let rules = self.reconciliation(current);
        let baseline_values: BTreeMap<&str, Option<&str>> = baseline
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.value.as_deref()))
            .collect();

        for property in current.properties.iter().filter(|p| p.tracked) {
            let rule = rules.iter().find(|r| r.property_name == property.name);
            let current_value = property.value.as_deref();
            if rule.and_then(|r| r.skip_value.as_deref()).is_some_and(|skip| current_value == Some(skip)) {
                debug!(property = property.name.as_str(), "tracked property has skip value, tolerated");
                continue;
            }

            let recorded = baseline_values.get(property.name.as_str()).copied();
            let baseline_value = match recorded {
                Some(value) => value,
                None => rule.and_then(|r| r.default_value.as_deref()),
            };
            if (recorded.is_none() && baseline_value.is_none()) || baseline_value != current_value {
                self.mismatch(
                    &property.name,
                    property.value.clone(),
                    recorded.flatten().map(str::to_string),
                    format!(
                        "Plugin: {} has mismatch in tracked property and cannot be reused",
                        current.execution_key()
                    ),
                    "Align properties between remote and local build or remove property from tracked \
                     list if mismatch could be tolerated. In some cases it is possible to add skip value \
                     to ignore lax mismatch",
                );
            }
        }

        let log = self.log_rules(current);
        for property in current.properties.iter().filter(|p| !p.tracked && log.includes(&p.name)) {
            let recorded = baseline_values.get(property.name.as_str()).copied().flatten();
            if recorded != property.value.as_deref() {
                self.logged += 1;
                info!(
                    execution = %current.execution_key(),
                    property = property.name.as_str(),
                    current = ?property.value,
                    baseline = ?recorded,
                    "logged property differs from baseline"
                );
            }
        }
    }

    fn log_rules(&self, execution: &CompletedExecution) -> LogRules<'a> {
        match LogRules::from_config(self.config, execution) {
            Ok(rules) => rules,
            Err(err) => {
                debug!(error = %err, "no property logging rules available");
                LogRules::default()
            }
        }
    }

    fn reconciliation(&self, execution: &CompletedExecution) -> &'a [TrackedProperty] {
        match self.config.tracked_properties(execution) {
            Ok(rules) => rules,
            Err(err) => {
                debug!(error = %err, "no reconciliation rules available");
                &[]
            }
        }
    }

    fn compare_files(&mut self, current: &ProjectsInputInfo, baseline: &ProjectsInputInfo) {
        let baseline_files = items_by_value(baseline, DigestType::File);
        let Some(current_files) = self.compare_sets(
            current,
            &baseline_files,
            DigestType::File,
            |added, removed| {
                (
                    "source files",
                    format!(
                        "Remote and local cache contain different sets of input files. \
                         Added files: {added}. Removed files: {removed}"
                    ),
                    "To match remote and local caches should have identical file sets. \
                     Unnecessary and transient files must be filtered out to make file sets match \
                     - see configuration guide",
                )
            },
        ) else {
            return;
        };

        for file in current_files {
            let Some(baseline_file) = baseline_files.get(file.value()) else {
                continue;
            };
            if file.hash() == baseline_file.hash() {
                continue;
            }
            self.mismatch(
                file.value(),
                Some(file.hash().to_string()),
                Some(baseline_file.hash().to_string()),
                file_reason(file, baseline_file),
                "Different content manifests different build outcome. \
                 Ensure that difference is not caused by environment specifics, like line separators",
            );
        }
    }

    fn compare_dependencies(&mut self, current: &ProjectsInputInfo, baseline: &ProjectsInputInfo) {
        let baseline_dependencies = items_by_value(baseline, DigestType::Dependency);
        let Some(current_dependencies) = self.compare_sets(
            current,
            &baseline_dependencies,
            DigestType::Dependency,
            |added, removed| {
                (
                    "dependencies files",
                    format!(
                        "Remote and local builds contain different sets of dependencies and cannot be matched. \
                         Added dependencies: {added}. Removed dependencies: {removed}"
                    ),
                    "Remote and local builds should have identical dependencies. \
                     The difference manifests changes in downstream dependencies or introduced snapshots.",
                )
            },
        ) else {
            return;
        };

        for dependency in current_dependencies {
            let Some(baseline_dependency) = baseline_dependencies.get(dependency.value()) else {
                continue;
            };
            if dependency.hash() != baseline_dependency.hash() {
                self.mismatch(
                    dependency.value(),
                    Some(dependency.hash().to_string()),
                    Some(baseline_dependency.hash().to_string()),
                    "Downstream project or snapshot changed".to_string(),
                    "Find downstream project and investigate difference in the downstream project. \
                     Enable fail fast mode and single threaded execution to simplify debug.",
                );
            }
        }
    }

    /// Returns the current items of `item_type` when both sides hold the same
    /// set of values. Otherwise records one aggregate mismatch built by
    /// `describe` and returns `None`.
    fn compare_sets<'i, F>(
        &mut self,
        current: &'i ProjectsInputInfo,
        baseline: &BTreeMap<&str, &DigestItem>,
        item_type: DigestType,
        describe: F,
    ) -> Option<Vec<&'i DigestItem>>
    where
        F: FnOnce(String, String) -> (&'static str, String, &'static str),
    {
        let items: Vec<&DigestItem> = current.items_of(item_type).collect();
        let current_values: BTreeSet<&str> = items.iter().map(|item| item.value()).collect();
        let baseline_values: BTreeSet<&str> = baseline.keys().copied().collect();
        if current_values == baseline_values {
            return Some(items);
        }

        let added = list(current_values.difference(&baseline_values));
        let removed = list(baseline_values.difference(&current_values));
        let (item, reason, resolution) = describe(added, removed);
        self.mismatch(item, None, None, reason, resolution);
        None
    }

    fn mismatch(
        &mut self,
        item: &str,
        current: Option<String>,
        baseline: Option<String>,
        reason: String,
        resolution: &str,
    ) {
        debug!(item, reason = reason.as_str(), "mismatch");
        self.report.push(Mismatch {
            item: item.to_string(),
            current,
            baseline,
            reason,
            resolution: resolution.to_string(),
        });
    }
}

/// Selects the untracked properties of an execution that are logged.
#[derive(Debug, Default)]
struct LogRules<'a> {
    all: bool,
    logs: &'a [String],
    nologs: &'a [String],
}

impl<'c> LogRules<'c> {
    fn from_config(config: &'c CacheConfig, execution: &CompletedExecution) -> Result<Self, ConfigError> {
        Ok(Self {
            all: config.is_log_all_properties(execution)?,
            logs: config.logged_properties(execution)?,
            nologs: config.nolog_properties(execution)?,
        })
    }

    fn includes(&self, name: &str) -> bool {
        !self.nologs.iter().any(|n| n == name) && (self.all || self.logs.iter().any(|n| n == name))
    }
}

fn items_by_value(info: &ProjectsInputInfo, item_type: DigestType) -> BTreeMap<&str, &DigestItem> {
    info.items_of(item_type).map(|item| (item.value(), item)).collect()
}

fn list<S: AsRef<str>>(values: impl Iterator<Item = S>) -> String {
    let values: Vec<String> = values.map(|v| v.as_ref().to_string()).collect();
    format!("[{}]", values.join(", "))
}

fn file_reason(current: &DigestItem, baseline: &DigestItem) -> String {
    let mut reason = String::from("File content is different.");
    if let (Some(local), Some(remote)) = (current.eol(), baseline.eol()) {
        if local != remote {
            reason.push_str(&format!(
                " Different line endings detected (text files relevant). Remote: {remote}, local: {local}."
            ));
        }
    }
    if let (Some(local), Some(remote)) = (current.charset(), baseline.charset()) {
        if local != remote {
            reason.push_str(&format!(
                " Different charset detected (text files relevant). Remote: {remote}, local: {local}."
            ));
        }
    }
    reason
}
