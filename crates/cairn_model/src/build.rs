//! Build records: the fingerprint plus the executions a build completed.

use serde::{Deserialize, Serialize};

use crate::digest::ProjectsInputInfo;

/// One recorded plugin property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValue {
    /// Property name.
    pub name: String,
    /// Recorded value.
    #[serde(default)]
    pub value: Option<String>,
    /// Whether the property takes part in reconciliation.
    #[serde(default)]
    pub tracked: bool,
}

impl PropertyValue {
    /// Creates a tracked property.
    pub fn tracked(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            tracked: true,
        }
    }

    /// Creates a property that is recorded for information only.
    pub fn logged(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            tracked: false,
        }
    }
}

/// A plugin goal execution completed by a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedExecution {
    /// Plugin group identifier.
    pub group_id: String,
    /// Plugin artifact identifier.
    pub artifact_id: String,
    /// Goal that ran.
    pub goal: String,
    /// Execution id.
    pub execution_id: String,
    /// Recorded property values.
    #[serde(default)]
    pub properties: Vec<PropertyValue>,
}

impl CompletedExecution {
    /// Creates an execution record with no properties.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        goal: impl Into<String>,
        execution_id: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            goal: goal.into(),
            execution_id: execution_id.into(),
            properties: Vec::new(),
        }
    }

    /// Appends a property value.
    pub fn with_property(mut self, property: PropertyValue) -> Self {
        self.properties.push(property);
        self
    }

    /// Identity of the execution: `artifactId:goal:executionId@groupId`.
    pub fn execution_key(&self) -> String {
        format!(
            "{}:{}:{}@{}",
            self.artifact_id, self.goal, self.execution_id, self.group_id
        )
    }
}

/// A recorded build of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Name of the hash algorithm the fingerprint was computed with.
    pub hash_function: String,
    /// The unit fingerprint.
    pub projects_input_info: ProjectsInputInfo,
    /// Executions the build completed.
    #[serde(default)]
    pub executions: Vec<CompletedExecution>,
}

impl BuildInfo {
    /// Creates a build record without executions.
    pub fn new(hash_function: impl Into<String>, projects_input_info: ProjectsInputInfo) -> Self {
        Self {
            hash_function: hash_function.into(),
            projects_input_info,
            executions: Vec::new(),
        }
    }

    /// Appends a completed execution.
    pub fn with_execution(mut self, execution: CompletedExecution) -> Self {
        self.executions.push(execution);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_key_format() {
        let exec = CompletedExecution::new(
            "org.apache.maven.plugins",
            "maven-compiler-plugin",
            "compile",
            "default-compile",
        );
        assert_eq!(
            exec.execution_key(),
            "maven-compiler-plugin:compile:default-compile@org.apache.maven.plugins"
        );
    }

    #[test]
    fn build_info_json_roundtrip() {
        let info = BuildInfo::new("XX", ProjectsInputInfo::new("c", vec![])).with_execution(
            CompletedExecution::new("g", "p", "run", "default")
                .with_property(PropertyValue::tracked("skip", "false")),
        );
        let json = serde_json::to_string(&info).unwrap();
        let back: BuildInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }
}
