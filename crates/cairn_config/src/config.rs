//! The cache configuration state machine.

use cairn_common::HashAlgorithm;
use cairn_model::{CompletedExecution, Plugin, PluginExecution};

use crate::error::ConfigError;
use crate::scan::PluginScanConfig;
use crate::types::{CacheFile, GoalReconciliation, IncludePath, PluginInputConfig, TrackedProperty};

/// File-name glob used when neither the configuration nor the unit sets one.
pub const DEFAULT_GLOB: &str = "{*.java,*.groovy,*.yaml,*.svcd,*.proto,*assembly.xml,assembly*.xml,*logback.xml,*.vm,*.ini,*.jks,*.properties,*.sh,*.bat}";

/// Read-only cache configuration, either fully initialized or disabled.
///
/// Every accessor fails with [`ConfigError::Disabled`] when caching is off;
/// callers are expected to check [`CacheConfig::is_enabled`] first.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    state: State,
}

#[derive(Debug, Clone)]
enum State {
    Disabled,
    Initialized {
        file: Box<CacheFile>,
        algorithm: HashAlgorithm,
    },
}

impl CacheConfig {
    /// A configuration with caching switched off.
    pub fn disabled() -> Self {
        Self {
            state: State::Disabled,
        }
    }

    /// Initializes the configuration from a parsed file.
    ///
    /// Returns a disabled configuration when the file says `enabled = false`.
    pub fn initialize(file: CacheFile) -> Result<Self, ConfigError> {
        if !file.cache.enabled {
            return Ok(Self::disabled());
        }
        let algorithm = HashAlgorithm::from_name(&file.cache.hash_algorithm)
            .map_err(|_| ConfigError::UnsupportedHashAlgorithm(file.cache.hash_algorithm.clone()))?;
        Ok(Self {
            state: State::Initialized {
                file: Box::new(file),
                algorithm,
            },
        })
    }

    /// Returns `true` if caching is enabled.
    pub fn is_enabled(&self) -> bool {
        matches!(self.state, State::Initialized { .. })
    }

    fn file(&self) -> Result<&CacheFile, ConfigError> {
        match &self.state {
            State::Initialized { file, .. } => Ok(file),
            State::Disabled => Err(ConfigError::Disabled),
        }
    }

    /// The digest algorithm used for fingerprints.
    pub fn hash_algorithm(&self) -> Result<HashAlgorithm, ConfigError> {
        match &self.state {
            State::Initialized { algorithm, .. } => Ok(*algorithm),
            State::Disabled => Err(ConfigError::Disabled),
        }
    }

    /// The file-name glob applied when a unit does not override it.
    pub fn default_glob(&self) -> Result<&str, ConfigError> {
        Ok(self.file()?.input.global.glob.as_deref().unwrap_or(DEFAULT_GLOB))
    }

    /// Extra input paths walked for every unit.
    pub fn global_includes(&self) -> Result<&[IncludePath], ConfigError> {
        Ok(&self.file()?.input.global.includes)
    }

    /// Paths never scanned for any unit.
    pub fn global_excludes(&self) -> Result<&[String], ConfigError> {
        Ok(&self.file()?.input.global.excludes)
    }

    /// Whether plugin configurations are scanned for input paths.
    pub fn is_process_plugins(&self) -> Result<bool, ConfigError> {
        Ok(self.file()?.cache.process_plugins)
    }

    /// Whether fingerprints are compared against a baseline while computed.
    pub fn is_baseline_diff_enabled(&self) -> Result<bool, ConfigError> {
        Ok(self.file()?.cache.baseline_url.is_some())
    }

    /// Location of the baseline build records.
    pub fn baseline_url(&self) -> Result<Option<&str>, ConfigError> {
        Ok(self.file()?.cache.baseline_url.as_deref())
    }

    fn plugin_config(&self, plugin: &Plugin) -> Result<Option<&PluginInputConfig>, ConfigError> {
        Ok(self
            .file()?
            .input
            .plugins
            .iter()
            .find(|p| p.matches(&plugin.group_id, &plugin.artifact_id)))
    }

    /// Probing policy for a plugin's own configuration.
    pub fn plugin_dir_scan_config(&self, plugin: &Plugin) -> Result<PluginScanConfig, ConfigError> {
        Ok(self
            .plugin_config(plugin)?
            .and_then(|p| p.dir_scan.as_ref())
            .map(PluginScanConfig::from_dir_scan)
            .unwrap_or_default())
    }

    /// Probing policy for one execution of a plugin, before merging.
    pub fn execution_dir_scan_config(
        &self,
        plugin: &Plugin,
        execution: &PluginExecution,
    ) -> Result<PluginScanConfig, ConfigError> {
        Ok(self
            .plugin_config(plugin)?
            .and_then(|p| p.executions.iter().find(|e| e.exec_ids.contains(&execution.id)))
            .and_then(|e| e.dir_scan.as_ref())
            .map(PluginScanConfig::from_dir_scan)
            .unwrap_or_default())
    }

    /// Configuration tags removed from a plugin in the canonical effective configuration.
    pub fn effective_pom_exclude_properties(&self, plugin: &Plugin) -> Result<&[String], ConfigError> {
        Ok(self
            .plugin_config(plugin)?
            .map(|p| p.effective_pom_exclude_properties.as_slice())
            .unwrap_or(&[]))
    }

    fn goal_reconciliation(
        &self,
        execution: &CompletedExecution,
    ) -> Result<Option<&GoalReconciliation>, ConfigError> {
        Ok(self.file()?.reconcile.plugins.iter().find(|g| {
            g.matches(&execution.group_id, &execution.artifact_id, &execution.goal)
        }))
    }

    /// Properties of an execution that must match the baseline.
    pub fn tracked_properties(&self, execution: &CompletedExecution) -> Result<&[TrackedProperty], ConfigError> {
        Ok(self
            .goal_reconciliation(execution)?
            .map(|g| g.reconciles.as_slice())
            .unwrap_or(&[]))
    }

    /// Properties of an execution logged for information.
    pub fn logged_properties(&self, execution: &CompletedExecution) -> Result<&[String], ConfigError> {
        Ok(self
            .goal_reconciliation(execution)?
            .map(|g| g.logs.as_slice())
            .unwrap_or(&[]))
    }

    /// Properties of an execution that are never logged.
    pub fn nolog_properties(&self, execution: &CompletedExecution) -> Result<&[String], ConfigError> {
        Ok(self
            .goal_reconciliation(execution)?
            .map(|g| g.nologs.as_slice())
            .unwrap_or(&[]))
    }

    /// Whether every property of an execution is logged.
    pub fn is_log_all_properties(&self, execution: &CompletedExecution) -> Result<bool, ConfigError> {
        let global = self.file()?.reconcile.log_all_properties;
        Ok(global || self.goal_reconciliation(execution)?.is_some_and(|g| g.log_all))
    }
}
