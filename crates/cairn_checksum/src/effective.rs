//! Canonical serialization of a unit's effective model.
//!
//! Only the fields that affect build semantics are kept, lists whose order is
//! incidental are sorted, and machine-specific text (the checkout location,
//! path separators, OS classifiers) is normalized away so the same logical
//! unit serializes identically on every machine.

use std::path::Path;

use cairn_config::CacheConfig;
use cairn_model::{BuildModel, Model, Plugin};
use serde_json::Value;

use crate::error::ChecksumError;

/// Replacement for OS names embedded in configuration values.
const OS_CLASSIFIER: &str = "os.classifier";

/// Reduces an effective model to its build-relevant canonical form.
pub fn canonical_model(model: &Model, config: &CacheConfig) -> Result<Model, ChecksumError> {
    let mut dependencies = model.dependencies.clone();
    dependencies.sort_by(|a, b| a.artifact_id.cmp(&b.artifact_id));
    Ok(Model {
        group_id: model.group_id.clone(),
        artifact_id: model.artifact_id.clone(),
        version: model.version.clone(),
        packaging: model.packaging.clone(),
        modules: model.modules.clone(),
        dependencies,
        build: BuildModel {
            plugin_management: normalize_plugins(&model.build.plugin_management, config)?,
            plugins: normalize_plugins(&model.build.plugins, config)?,
        },
    })
}

fn normalize_plugins(plugins: &[Plugin], config: &CacheConfig) -> Result<Vec<Plugin>, ChecksumError> {
    plugins
        .iter()
        .map(|plugin| {
            let excluded = config.effective_pom_exclude_properties(plugin)?;
            let mut plugin = plugin.clone();
            if let Some(configuration) = plugin.configuration.as_mut() {
                configuration.remove_children_named(excluded);
            }
            for execution in &mut plugin.executions {
                if let Some(configuration) = execution.configuration.as_mut() {
                    configuration.remove_children_named(excluded);
                }
            }
            plugin.dependencies.sort_by(|a, b| a.artifact_id.cmp(&b.artifact_id));
            Ok(plugin)
        })
        .collect()
}

/// Serializes the canonical model of a unit rooted at `base_dir`.
///
/// The output is pretty-printed JSON with object keys in sorted order.
pub fn effective_pom(model: &Model, base_dir: &Path, config: &CacheConfig) -> Result<String, ChecksumError> {
    let canonical = canonical_model(model, config)?;
    let mut value = serde_json::to_value(&canonical)?;
    let base = base_dir.to_string_lossy();
    let slashed_base = base.replace('\\', "/");
    normalize_strings(&mut value, &[base.as_ref(), slashed_base.as_str()]);
    Ok(serde_json::to_string_pretty(&value)?)
}

fn normalize_strings(value: &mut Value, base_dirs: &[&str]) {
    match value {
        Value::String(text) => *text = normalize_text(text, base_dirs),
        Value::Array(items) => items.iter_mut().for_each(|v| normalize_strings(v, base_dirs)),
        Value::Object(map) => map.values_mut().for_each(|v| normalize_strings(v, base_dirs)),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Removes machine-specific fragments from one configuration string.
pub fn normalize_text(text: &str, base_dirs: &[&str]) -> String {
    let mut normalized = text.to_string();
    for base in base_dirs.iter().filter(|b| !b.is_empty()) {
        normalized = normalized.replace(base, "");
    }
    normalized
        .replace('\\', "/")
        .replace("windows", OS_CLASSIFIER)
        .replace("linux", OS_CLASSIFIER)
}
