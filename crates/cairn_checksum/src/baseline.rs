//! Advisory comparison against a baseline fingerprint while items are produced.
//!
//! The comparison only logs and records verdicts. It never changes the
//! checksum or fails the calculation.

use cairn_model::{DigestItem, DigestType, ProjectsInputInfo};
use tracing::info;

/// Per-category outcome of comparing a fingerprint with its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaselineVerdict {
    /// Whether the effective configuration matched; `None` when the baseline
    /// has no effective configuration item.
    pub effective_pom: Option<bool>,
    /// Whether every input file matched.
    pub sources: bool,
    /// Whether every dependency matched.
    pub dependencies: bool,
}

impl BaselineVerdict {
    /// Returns `true` if no category is out of date.
    pub fn is_match(&self) -> bool {
        self.effective_pom != Some(false) && self.sources && self.dependencies
    }
}

fn label(matched: bool) -> &'static str {
    if matched {
        "MATCHED"
    } else {
        "OUT OF DATE"
    }
}

pub(crate) struct BaselineComparison<'a> {
    baseline: &'a ProjectsInputInfo,
    verdict: BaselineVerdict,
}

impl<'a> BaselineComparison<'a> {
    pub(crate) fn new(baseline: &'a ProjectsInputInfo) -> Self {
        Self {
            baseline,
            verdict: BaselineVerdict {
                effective_pom: None,
                sources: true,
                dependencies: true,
            },
        }
    }

    pub(crate) fn check_pom(&mut self, item: &DigestItem) {
        let Some(baseline) = self.baseline.pom() else {
            return;
        };
        let matched = baseline.hash() == item.hash();
        if !matched {
            info!(
                current = item.hash(),
                baseline = baseline.hash(),
                "mismatch in effective pom"
            );
        }
        info!("Effective pom: {}", label(matched));
        self.verdict.effective_pom = Some(matched);
    }

    pub(crate) fn check_item(&mut self, item: &DigestItem) {
        let matched = match self.baseline.find(item.item_type(), item.value()) {
            Some(baseline) if baseline.hash() == item.hash() => true,
            Some(baseline) => {
                info!(
                    kind = %item.item_type(),
                    value = item.value(),
                    current = item.hash(),
                    baseline = baseline.hash(),
                    "mismatch in baseline item"
                );
                false
            }
            None => {
                info!(
                    kind = %item.item_type(),
                    value = item.value(),
                    "item not found in baseline"
                );
                false
            }
        };
        match item.item_type() {
            DigestType::Dependency => self.verdict.dependencies &= matched,
            _ => self.verdict.sources &= matched,
        }
    }

    pub(crate) fn finish(self) -> BaselineVerdict {
        info!("Source code: {}", label(self.verdict.sources));
        info!("Dependencies: {}", label(self.verdict.dependencies));
        self.verdict
    }
}
