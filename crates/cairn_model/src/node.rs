//! Plugin configuration trees.
//!
//! Plugin configuration is an arbitrary tree of named tags with optional text
//! values and attributes. The scanner only needs read access through the
//! [`ConfigNode`] trait, so any tree representation can be plugged in.
//! [`ConfigTree`] is the owned implementation used by the model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Read-only view of one node in a configuration tree.
pub trait ConfigNode {
    /// The tag name of this node.
    fn name(&self) -> &str;

    /// The text value of this node, if any.
    fn value(&self) -> Option<&str>;

    /// Looks up an attribute by name.
    fn attribute(&self, key: &str) -> Option<&str>;

    /// The child nodes, in document order.
    fn children(&self) -> Vec<&dyn ConfigNode>;
}

/// An owned configuration tree node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigTree {
    /// Tag name.
    pub name: String,
    /// Text value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Attributes, ordered by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Child nodes in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ConfigTree>,
}

impl ConfigTree {
    /// Creates an empty node with the given tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a leaf node carrying a text value.
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Appends a child node.
    pub fn with_child(mut self, child: ConfigTree) -> Self {
        self.children.push(child);
        self
    }

    /// Sets an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Removes, at every depth, the children whose tag name is in `names`.
    pub fn remove_children_named(&mut self, names: &[String]) {
        self.children.retain(|child| !names.contains(&child.name));
        for child in &mut self.children {
            child.remove_children_named(names);
        }
    }
}

impl ConfigNode for ConfigTree {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    fn children(&self) -> Vec<&dyn ConfigNode> {
        self.children.iter().map(|c| c as &dyn ConfigNode).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConfigTree {
        ConfigTree::new("configuration")
            .with_child(ConfigTree::leaf("source", "17"))
            .with_child(
                ConfigTree::new("compilerArgs")
                    .with_child(ConfigTree::leaf("arg", "-Xlint"))
                    .with_child(ConfigTree::leaf("source", "nested")),
            )
            .with_child(ConfigTree::leaf("schema", "src/main/xsd").with_attribute("remote.cache.input", "true"))
    }

    #[test]
    fn node_accessors() {
        let tree = sample();
        let node: &dyn ConfigNode = &tree;
        assert_eq!(node.name(), "configuration");
        assert_eq!(node.value(), None);
        let children = node.children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].value(), Some("17"));
        assert_eq!(children[2].attribute("remote.cache.input"), Some("true"));
        assert_eq!(children[2].attribute("missing"), None);
    }

    #[test]
    fn remove_children_named_is_recursive() {
        let mut tree = sample();
        tree.remove_children_named(&["source".to_string()]);
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].name, "compilerArgs");
        assert_eq!(tree.children[0].children.len(), 1);
        assert_eq!(tree.children[0].children[0].name, "arg");
    }

    #[test]
    fn serde_skips_empty_fields() {
        let json = serde_json::to_string(&ConfigTree::leaf("a", "b")).unwrap();
        assert_eq!(json, r#"{"name":"a","value":"b"}"#);
        let back: ConfigTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ConfigTree::leaf("a", "b"));
    }
}
