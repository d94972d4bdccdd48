//! Configuration types deserialized from the cache configuration file.

use serde::Deserialize;

use crate::scan::{ScanMode, TagScanConfig};

/// The top-level cache configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheFile {
    /// Core cache settings.
    #[serde(default)]
    pub cache: CacheSection,
    /// Input selection rules.
    #[serde(default)]
    pub input: InputSection,
    /// Baseline reconciliation rules.
    #[serde(default)]
    pub reconcile: ReconcileSection,
}

/// The `[cache]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Whether caching is enabled at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Name of the digest algorithm used for fingerprints.
    #[serde(default = "default_hash_algorithm")]
    pub hash_algorithm: String,
    /// Whether plugin configurations are scanned for extra input paths.
    #[serde(default = "default_true")]
    pub process_plugins: bool,
    /// Location of the baseline build records; presence enables baseline diffing.
    #[serde(default)]
    pub baseline_url: Option<String>,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            enabled: true,
            hash_algorithm: default_hash_algorithm(),
            process_plugins: true,
            baseline_url: None,
        }
    }
}

/// The `[input]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputSection {
    /// Rules applying to every unit.
    #[serde(default)]
    pub global: GlobalInput,
    /// Per-plugin configuration probing rules.
    #[serde(default)]
    pub plugins: Vec<PluginInputConfig>,
}

/// The `[input.global]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalInput {
    /// Glob applied to file names in every scanned directory.
    #[serde(default)]
    pub glob: Option<String>,
    /// Extra input paths walked for every unit.
    #[serde(default)]
    pub includes: Vec<IncludePath>,
    /// Paths never scanned, relative to the unit base directory.
    #[serde(default)]
    pub excludes: Vec<String>,
}

/// One extra input path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IncludePath {
    /// Path to walk, relative to the unit base directory unless absolute.
    pub path: String,
    /// Glob override for this path.
    #[serde(default)]
    pub glob: Option<String>,
    /// Whether subdirectories are walked.
    #[serde(default = "default_true")]
    pub recursive: bool,
}

/// One `[[input.plugins]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginInputConfig {
    /// Plugin artifact id this entry applies to.
    pub artifact_id: String,
    /// Plugin group id; any group matches when absent.
    #[serde(default)]
    pub group_id: Option<String>,
    /// Configuration tags stripped from the canonical effective configuration.
    #[serde(default)]
    pub effective_pom_exclude_properties: Vec<String>,
    /// Plugin-level probing rules.
    #[serde(default)]
    pub dir_scan: Option<DirScanConfig>,
    /// Execution-level probing rules.
    #[serde(default)]
    pub executions: Vec<ExecutionInputConfig>,
}

impl PluginInputConfig {
    /// Returns `true` if this entry applies to the given plugin coordinates.
    pub fn matches(&self, group_id: &str, artifact_id: &str) -> bool {
        self.artifact_id == artifact_id
            && self
                .group_id
                .as_deref()
                .map_or(true, |g| g.is_empty() || g == group_id)
    }
}

/// One `[[input.plugins.executions]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionInputConfig {
    /// Execution ids this entry applies to.
    pub exec_ids: Vec<String>,
    /// Probing rules for those executions.
    #[serde(default)]
    pub dir_scan: Option<DirScanConfig>,
}

/// Probing rules as written in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DirScanConfig {
    /// Probing mode; inherited from the parent scope when absent.
    #[serde(default)]
    pub mode: Option<ScanMode>,
    /// When set, parent-scope rules are discarded instead of merged.
    #[serde(default)]
    pub ignore_parent: bool,
    /// Tags that are scanned, with per-tag walk settings.
    #[serde(default)]
    pub includes: Vec<TagScanConfig>,
    /// Tags that are never scanned.
    #[serde(default)]
    pub excludes: Vec<String>,
}

/// The `[reconcile]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReconcileSection {
    /// Log every plugin property, not only the configured ones.
    #[serde(default)]
    pub log_all_properties: bool,
    /// Per-goal reconciliation rules.
    #[serde(default)]
    pub plugins: Vec<GoalReconciliation>,
}

/// Reconciliation rules for one plugin goal.
#[derive(Debug, Clone, Deserialize)]
pub struct GoalReconciliation {
    /// Plugin artifact id.
    pub artifact_id: String,
    /// Plugin group id; any group matches when absent.
    #[serde(default)]
    pub group_id: Option<String>,
    /// Goal name.
    pub goal: String,
    /// Log every property of this goal.
    #[serde(default)]
    pub log_all: bool,
    /// Properties logged for information.
    #[serde(default)]
    pub logs: Vec<String>,
    /// Properties never logged.
    #[serde(default)]
    pub nologs: Vec<String>,
    /// Properties that must match the baseline.
    #[serde(default)]
    pub reconciles: Vec<TrackedProperty>,
}

impl GoalReconciliation {
    /// Returns `true` if these rules apply to the given goal.
    pub fn matches(&self, group_id: &str, artifact_id: &str, goal: &str) -> bool {
        self.artifact_id == artifact_id
            && self.goal == goal
            && self
                .group_id
                .as_deref()
                .map_or(true, |g| g.is_empty() || g == group_id)
    }
}

/// A plugin property that must match the baseline for outputs to be reused.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackedProperty {
    /// Property name.
    pub property_name: String,
    /// Value meaning "this goal was skipped"; tolerated against any baseline.
    #[serde(default)]
    pub skip_value: Option<String>,
    /// Value assumed when the property is not recorded.
    #[serde(default)]
    pub default_value: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_hash_algorithm() -> String {
    "XX".to_string()
}
