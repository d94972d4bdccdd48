//! Baseline comparison reports.

use serde::{Deserialize, Serialize};

/// One discrepancy between a current build and its baseline.
///
/// Each entry is self-contained so tooling can render it on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// What differs (file path, dependency key, property name, ...).
    pub item: String,
    /// Value on the current side.
    pub current: Option<String>,
    /// Value on the baseline side.
    pub baseline: Option<String>,
    /// Why the difference prevents reuse.
    pub reason: String,
    /// Suggested remedy.
    pub resolution: String,
}

/// Ordered list of mismatches produced by one comparison.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Diff {
    mismatches: Vec<Mismatch>,
}

impl Diff {
    /// Wraps an ordered list of mismatches.
    pub fn new(mismatches: Vec<Mismatch>) -> Self {
        Self { mismatches }
    }

    /// The mismatches in comparison order.
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// Iterates the mismatches in comparison order.
    pub fn iter(&self) -> std::slice::Iter<'_, Mismatch> {
        self.mismatches.iter()
    }

    /// Number of mismatches.
    pub fn len(&self) -> usize {
        self.mismatches.len()
    }

    /// Returns `true` when both builds matched.
    pub fn is_empty(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl IntoIterator for Diff {
    type Item = Mismatch;
    type IntoIter = std::vec::IntoIter<Mismatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.mismatches.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diff {
    type Item = &'a Mismatch;
    type IntoIter = std::slice::Iter<'a, Mismatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.mismatches.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mismatch(item: &str) -> Mismatch {
        Mismatch {
            item: item.to_string(),
            current: Some("b".to_string()),
            baseline: None,
            reason: "differs".to_string(),
            resolution: "align".to_string(),
        }
    }

    #[test]
    fn keeps_comparison_order() {
        let diff = Diff::new(vec![mismatch("effectivePom"), mismatch("src/A.java")]);
        assert_eq!(diff.len(), 2);
        assert!(!diff.is_empty());
        assert_eq!(diff.mismatches()[1].item, "src/A.java");
        let borrowed: Vec<&str> = (&diff).into_iter().map(|m| m.item.as_str()).collect();
        assert_eq!(borrowed, ["effectivePom", "src/A.java"]);
        let owned: Vec<String> = diff.into_iter().map(|m| m.item).collect();
        assert_eq!(owned, ["effectivePom", "src/A.java"]);
    }

    #[test]
    fn empty_diff_means_match() {
        let diff = Diff::default();
        assert!(diff.is_empty());
        assert_eq!(diff.iter().count(), 0);
    }

    #[test]
    fn serialized_shape() {
        let json = serde_json::to_value(Diff::new(vec![mismatch("target")])).unwrap();
        assert_eq!(json["mismatches"][0]["item"], "target");
        assert_eq!(json["mismatches"][0]["current"], "b");
        assert!(json["mismatches"][0]["baseline"].is_null());
    }
}
