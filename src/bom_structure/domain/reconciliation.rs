use super::ArticleCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Multiset of article codes: code -> number of occurrences
pub type CodeCounts = BTreeMap<ArticleCode, u64>;

/// Comparison of the quantities a BOM requires against the codes observed in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub main_code: ArticleCode,
    /// Sum of the expected multiset
    pub total_expected: u64,
    /// Sum of the observed multiset
    pub total_observed: u64,
    /// Codes observed exactly as often as expected
    pub matched: CodeCounts,
    /// Expected codes observed fewer times than required, with the shortfall
    pub missing: CodeCounts,
    /// Surplus observations, including codes the BOM does not contain at all
    pub extra: CodeCounts,
}

impl ReconciliationReport {
    pub fn has_discrepancies(&self) -> bool {
        !self.missing.is_empty() || !self.extra.is_empty()
    }

    pub fn matched_total(&self) -> u64 {
        saturating_total(&self.matched)
    }

    pub fn missing_total(&self) -> u64 {
        saturating_total(&self.missing)
    }

    pub fn extra_total(&self) -> u64 {
        saturating_total(&self.extra)
    }
}

/// Sum of all counts, saturating at `u64::MAX`
pub fn saturating_total(counts: &CodeCounts) -> u64 {
    counts.values().fold(0, |sum, &n| sum.saturating_add(n))
}
